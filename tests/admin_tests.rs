mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

/// Sign up a person and promote them to super admin through the database.
async fn super_admin(app: &common::TestApp) -> (String, Value) {
    let (token, user) = app.sign_up("sub-root", "root@x.com", "Root", "Admin").await;
    app.make_super_admin(user["id"].as_str().unwrap()).await;
    (token, user)
}

/// Create an invitation for `email` into the organization `org_id`.
async fn invite(app: &common::TestApp, token: &str, org_id: &str, email: &str) -> Value {
    let (body, status) = app
        .post_auth(
            &format!("/api/admin/organizations/{org_id}/invite"),
            token,
            &json!({ "email": email, "role": "gestionnaire" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "invite failed: {body}");
    body
}

// ── Invitations ─────────────────────────────────────────────────

#[tokio::test]
async fn invitation_can_be_inspected_and_accepted_once() {
    let app = common::spawn_app().await;
    let (root, _) = super_admin(&app).await;
    let (_, owner) = app.sign_up("sub-owner", "owner@x.com", "Olive", "Owner").await;
    let org_id = owner["organizationId"].as_str().unwrap();

    let created = invite(&app, &root, org_id, "Guest@X.com").await;
    let token = created["token"].as_str().unwrap();
    assert_eq!(token.len(), 64);
    assert!(created["url"].as_str().unwrap().ends_with(token));
    assert!(created["invitation"].get("tokenHash").is_none());

    let (details, status) = app.get(&format!("/api/invitations/{token}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["email"], "guest@x.com");
    assert_eq!(details["organizationId"], org_id);
    assert_eq!(details["status"], "pending");
    assert_eq!(details["isUsed"], false);
    assert_eq!(details["invitedBy"], "Root Admin");

    let guest = app.identity_token("sub-guest", "guest@x.com", "Gina", "Guest");
    let (accepted, status) = app
        .post_auth(&format!("/api/invitations/{token}/accept"), &guest, &json!({}))
        .await;
    assert_eq!(status, StatusCode::OK, "{accepted}");
    assert_eq!(accepted["user"]["organizationId"], org_id);
    assert_eq!(accepted["user"]["role"], "gestionnaire");

    let (_, status) = app
        .post_auth(&format!("/api/invitations/{token}/accept"), &guest, &json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (details, _) = app.get(&format!("/api/invitations/{token}")).await;
    assert_eq!(details["isUsed"], true);
    assert_eq!(details["status"], "accepted");

    let (me, _) = app.get_auth("/api/auth/user", &guest).await;
    assert_eq!(me["organizationId"], org_id);

    common::cleanup(app).await;
}

#[tokio::test]
async fn existing_user_moves_to_inviting_organization() {
    let app = common::spawn_app().await;
    let (root, _) = super_admin(&app).await;
    let (_, owner) = app.sign_up("sub-owner", "owner@x.com", "Olive", "Owner").await;
    let (guest, before) = app.sign_up("sub-guest", "guest@x.com", "Gina", "Guest").await;
    let org_id = owner["organizationId"].as_str().unwrap();

    let created = invite(&app, &root, org_id, "guest@x.com").await;
    let token = created["token"].as_str().unwrap();

    let (accepted, status) = app
        .post_auth(&format!("/api/invitations/{token}/accept"), &guest, &json!({}))
        .await;
    assert_eq!(status, StatusCode::OK, "{accepted}");
    assert_eq!(accepted["user"]["id"], before["id"]);
    assert_eq!(accepted["user"]["organizationId"], org_id);

    common::cleanup(app).await;
}

#[tokio::test]
async fn expired_invitation_conflicts() {
    let app = common::spawn_app().await;
    let (root, _) = super_admin(&app).await;
    let (_, owner) = app.sign_up("sub-owner", "owner@x.com", "Olive", "Owner").await;
    let created = invite(&app, &root, owner["organizationId"].as_str().unwrap(), "late@x.com").await;
    let token = created["token"].as_str().unwrap();

    sqlx::query("UPDATE invitations SET expires_at = now() - interval '1 hour'")
        .execute(&app.pool)
        .await
        .unwrap();

    let (details, _) = app.get(&format!("/api/invitations/{token}")).await;
    assert_eq!(details["isExpired"], true);
    assert_eq!(details["status"], "expired");

    let late = app.identity_token("sub-late", "late@x.com", "Lee", "Late");
    let (body, status) = app
        .post_auth(&format!("/api/invitations/{token}/accept"), &late, &json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Invitation has expired");

    common::cleanup(app).await;
}

#[tokio::test]
async fn invitation_for_another_email_is_forbidden() {
    let app = common::spawn_app().await;
    let (root, _) = super_admin(&app).await;
    let (_, owner) = app.sign_up("sub-owner", "owner@x.com", "Olive", "Owner").await;
    let created = invite(&app, &root, owner["organizationId"].as_str().unwrap(), "guest@x.com").await;
    let token = created["token"].as_str().unwrap();

    let eve = app.identity_token("sub-eve", "eve@x.com", "Eve", "E");
    let (_, status) = app
        .post_auth(&format!("/api/invitations/{token}/accept"), &eve, &json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The invitation is still usable by its recipient.
    let (details, _) = app.get(&format!("/api/invitations/{token}")).await;
    assert_eq!(details["isUsed"], false);

    common::cleanup(app).await;
}

#[tokio::test]
async fn concurrent_accepts_consume_invitation_once() {
    let app = common::spawn_app().await;
    let (root, _) = super_admin(&app).await;
    let (_, owner) = app.sign_up("sub-owner", "owner@x.com", "Olive", "Owner").await;
    let created = invite(&app, &root, owner["organizationId"].as_str().unwrap(), "guest@x.com").await;
    let token = created["token"].as_str().unwrap();
    let guest = app.identity_token("sub-guest", "guest@x.com", "Gina", "Guest");

    let mut handles = Vec::new();
    for _ in 0..8 {
        let client = app.client.clone();
        let url = app.url(&format!("/api/invitations/{token}/accept"));
        let guest = guest.clone();
        handles.push(tokio::spawn(async move {
            client
                .post(url)
                .bearer_auth(guest)
                .json(&json!({}))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => accepted += 1,
            StatusCode::CONFLICT => {}
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(accepted, 1);

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = 'guest@x.com'")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(users, 1);

    common::cleanup(app).await;
}

#[tokio::test]
async fn super_admin_keeps_role_when_accepting() {
    let app = common::spawn_app().await;
    let (root, _) = super_admin(&app).await;
    let (_, owner) = app.sign_up("sub-owner", "owner@x.com", "Olive", "Owner").await;
    let org_id = owner["organizationId"].as_str().unwrap();
    let created = invite(&app, &root, org_id, "root@x.com").await;
    let token = created["token"].as_str().unwrap();

    let (accepted, status) = app
        .post_auth(&format!("/api/invitations/{token}/accept"), &root, &json!({}))
        .await;
    assert_eq!(status, StatusCode::OK, "{accepted}");
    assert_eq!(accepted["user"]["organizationId"], org_id);
    assert_eq!(accepted["user"]["role"], "super_admin");

    common::cleanup(app).await;
}

#[tokio::test]
async fn unknown_invitation_is_not_found() {
    let app = common::spawn_app().await;
    let guest = app.identity_token("sub-guest", "guest@x.com", "Gina", "Guest");

    let (_, status) = app.get("/api/invitations/deadbeef").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, status) = app
        .post_auth("/api/invitations/deadbeef/accept", &guest, &json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    common::cleanup(app).await;
}

#[tokio::test]
async fn accepting_requires_identity() {
    let app = common::spawn_app().await;

    let (_, status) = app.post_json("/api/invitations/deadbeef/accept", &json!({})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    common::cleanup(app).await;
}

#[tokio::test]
async fn only_super_admin_can_invite() {
    let app = common::spawn_app().await;
    let (owner, owner_user) = app.sign_up("sub-owner", "owner@x.com", "Olive", "Owner").await;
    let org_id = owner_user["organizationId"].as_str().unwrap();

    let (_, status) = app
        .post_auth(
            &format!("/api/admin/organizations/{org_id}/invite"),
            &owner,
            &json!({ "email": "guest@x.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    common::cleanup(app).await;
}

// ── Promotion ───────────────────────────────────────────────────

#[tokio::test]
async fn promotion_with_correct_code_grants_super_admin() {
    let app = common::spawn_app().await;
    let (token, _) = app.sign_up("sub-bob", "bob@x.com", "Bob", "Martin").await;

    let (body, status) = app
        .post_json(
            "/api/admin/promote",
            &json!({ "email": "BOB@x.com", "securityCode": common::SETUP_CODE }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["user"]["role"], "super_admin");

    let (_, status) = app.get_auth("/api/admin/organizations", &token).await;
    assert_eq!(status, StatusCode::OK);

    common::cleanup(app).await;
}

#[tokio::test]
async fn wrong_code_and_unknown_email_look_the_same() {
    let app = common::spawn_app().await;
    app.sign_up("sub-bob", "bob@x.com", "Bob", "Martin").await;

    let (wrong_code, status_a) = app
        .post_json(
            "/api/admin/promote",
            &json!({ "email": "bob@x.com", "securityCode": "guess" }),
        )
        .await;
    let (unknown_email, status_b) = app
        .post_json(
            "/api/admin/promote",
            &json!({ "email": "nobody@x.com", "securityCode": common::SETUP_CODE }),
        )
        .await;

    assert_eq!(status_a, StatusCode::FORBIDDEN);
    assert_eq!(status_b, StatusCode::FORBIDDEN);
    assert_eq!(wrong_code, unknown_email);

    let role: String = sqlx::query_scalar("SELECT role::text FROM users WHERE email = 'bob@x.com'")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(role, "admin_entreprise");

    common::cleanup(app).await;
}

#[tokio::test]
async fn repeated_failures_lock_out_the_address() {
    let app = common::spawn_app().await;
    app.sign_up("sub-bob", "bob@x.com", "Bob", "Martin").await;

    for _ in 0..5 {
        let (_, status) = app
            .post_json(
                "/api/admin/promote",
                &json!({ "email": "bob@x.com", "securityCode": "guess" }),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    let (body, status) = app
        .post_json(
            "/api/admin/promote",
            &json!({ "email": "bob@x.com", "securityCode": common::SETUP_CODE }),
        )
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].as_str().unwrap().contains("Too many attempts"));

    // Once the window has passed the address may try again.
    sqlx::query("UPDATE promotion_attempts SET window_start = now() - interval '16 minutes'")
        .execute(&app.pool)
        .await
        .unwrap();
    let (_, status) = app
        .post_json(
            "/api/admin/promote",
            &json!({ "email": "bob@x.com", "securityCode": common::SETUP_CODE }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM promotion_attempts")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    common::cleanup(app).await;
}

#[tokio::test]
async fn concurrent_burst_evaluates_at_most_five_codes() {
    let app = common::spawn_app().await;
    app.sign_up("sub-bob", "bob@x.com", "Bob", "Martin").await;

    let mut handles = Vec::new();
    for i in 0..20 {
        let client = app.client.clone();
        let url = app.url("/api/admin/promote");
        handles.push(tokio::spawn(async move {
            client
                .post(url)
                .json(&json!({ "email": "bob@x.com", "securityCode": format!("guess-{i}") }))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }

    let (mut evaluated, mut throttled) = (0, 0);
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::FORBIDDEN => evaluated += 1,
            StatusCode::TOO_MANY_REQUESTS => throttled += 1,
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(evaluated, 5);
    assert_eq!(throttled, 15);

    common::cleanup(app).await;
}

#[tokio::test]
async fn forwarded_addresses_cannot_dodge_the_lockout() {
    let app = common::spawn_app_with(|config| {
        config.trusted_proxies = vec!["127.0.0.1/32".parse().unwrap()];
    })
    .await;
    app.sign_up("sub-bob", "bob@x.com", "Bob", "Martin").await;

    let attempt = |spoofed: String, client_addr: &'static str, code: &'static str| {
        app.client
            .post(app.url("/api/admin/promote"))
            .header("x-forwarded-for", format!("{spoofed}, {client_addr}"))
            .json(&json!({ "email": "bob@x.com", "securityCode": code }))
            .send()
    };

    for i in 0..5 {
        let resp = attempt(format!("6.6.6.{i}"), "203.0.113.5", "guess").await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    let resp = attempt("6.6.6.99".to_string(), "203.0.113.5", common::SETUP_CODE)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    // Another client behind the same proxy has its own counter.
    let resp = attempt("6.6.6.6".to_string(), "198.51.100.20", common::SETUP_CODE)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    common::cleanup(app).await;
}

#[tokio::test]
async fn promotion_is_disabled_without_setup_code() {
    let app = common::spawn_app_with(|config| config.admin_setup_code = None).await;
    app.sign_up("sub-bob", "bob@x.com", "Bob", "Martin").await;

    let (body, status) = app
        .post_json(
            "/api/admin/promote",
            &json!({ "email": "bob@x.com", "securityCode": "" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin promotion is disabled");

    common::cleanup(app).await;
}

// ── Admin API ───────────────────────────────────────────────────

#[tokio::test]
async fn super_admin_lists_and_updates_organizations() {
    let app = common::spawn_app().await;
    let (root, _) = super_admin(&app).await;
    let (owner, owner_user) = app.sign_up("sub-owner", "owner@x.com", "Olive", "Owner").await;
    let org_id = owner_user["organizationId"].as_str().unwrap();

    let (orgs, status) = app.get_auth("/api/admin/organizations", &root).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orgs.as_array().unwrap().len(), 2);

    let (updated, status) = app
        .patch_auth(
            &format!("/api/admin/organizations/{org_id}"),
            &root,
            &json!({
                "subscriptionStart": "2020-01-01T00:00:00Z",
                "subscriptionEnd": "2021-01-01T00:00:00Z",
                "subscriptionStatus": "expired"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["subscriptionStatus"], "expired");
    assert_eq!(updated["name"], "Entreprise Olive Owner");

    let (_, status) = app
        .patch_auth(
            &format!("/api/admin/organizations/{org_id}"),
            &root,
            &json!({ "subscriptionEnd": "2019-01-01T00:00:00Z" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (alerts, status) = app.get_auth("/api/admin/subscriptions/alerts", &root).await;
    assert_eq!(status, StatusCode::OK);
    let expired: Vec<&str> = alerts["expired"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap())
        .collect();
    assert_eq!(expired, vec![org_id]);

    // The owner itself has no access to the admin surface.
    let (_, status) = app.get_auth("/api/admin/subscriptions/alerts", &owner).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let missing = uuid::Uuid::new_v4();
    let (_, status) = app
        .patch_auth(&format!("/api/admin/organizations/{missing}"), &root, &json!({ "name": "X" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    common::cleanup(app).await;
}

#[tokio::test]
async fn super_admin_sees_organization_stats() {
    let app = common::spawn_app().await;
    let (root, _) = super_admin(&app).await;
    let (owner, owner_user) = app.sign_up("sub-owner", "owner@x.com", "Olive", "Owner").await;
    let org_id = owner_user["organizationId"].as_str().unwrap();
    app.create_vehicle(&owner, "AA-1").await;
    app.create_vehicle(&owner, "AA-2").await;

    let (stats, status) = app
        .get_auth(&format!("/api/admin/organizations/{org_id}/stats"), &root)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalVehicles"], 2);
    assert_eq!(stats["totalUsers"], 1);
    assert_eq!(stats["totalDrivers"], 0);

    common::cleanup(app).await;
}

#[tokio::test]
async fn super_admin_toggles_organization_features() {
    let app = common::spawn_app().await;
    let (root, _) = super_admin(&app).await;
    let (owner, owner_user) = app.sign_up("sub-owner", "owner@x.com", "Olive", "Owner").await;
    let org_id = owner_user["organizationId"].as_str().unwrap();
    let path = format!("/api/admin/organizations/{org_id}/settings");

    let (before, status) = app.get_auth(&path, &root).await;
    assert_eq!(status, StatusCode::OK);
    assert!(before["id"].is_null());

    let (saved, status) = app
        .patch_auth(&path, &root, &json!({ "enabledFeatures": ["vehicles", "drivers"] }))
        .await;
    assert_eq!(status, StatusCode::OK, "{saved}");
    assert_eq!(saved["enabledFeatures"], json!(["vehicles", "drivers"]));

    let (seen_by_owner, _) = app.get_auth("/api/settings", &owner).await;
    assert_eq!(seen_by_owner["enabledFeatures"], json!(["vehicles", "drivers"]));

    let (_, status) = app
        .patch_auth(&path, &root, &json!({ "enabledFeatures": ["teleport"] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    common::cleanup(app).await;
}
