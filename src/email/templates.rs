const BUTTON_STYLE: &str = "display: inline-block; padding: 10px 20px; background: #2563eb; color: white; text-decoration: none; border-radius: 4px;";

pub fn render_invitation(organization_name: &str, role: &str, url: &str, expires_at: &str) -> String {
    let organization_name = escape(organization_name);
    let role = escape(role);
    let url = escape(url);
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>You're invited to {organization_name}</h2>
    <p>You have been invited to join <strong>{organization_name}</strong> on Fleetdesk as <strong>{role}</strong>.</p>
    <p><a href="{url}" style="{BUTTON_STYLE}">Accept invitation</a></p>
    <p style="color: #666; font-size: 14px;">This link is valid until {expires_at} and can be used once. If you didn't expect this email, you can ignore it.</p>
</body>
</html>"#
    )
}

pub fn render_member_added(name: &str, organization_name: &str, base_url: &str) -> String {
    let name = escape(name);
    let organization_name = escape(organization_name);
    let base_url = escape(base_url);
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>You've been added to {organization_name}</h2>
    <p>Hi {name},</p>
    <p>An administrator added you to <strong>{organization_name}</strong> on Fleetdesk. Sign in with this email address to get started.</p>
    <p><a href="{base_url}" style="{BUTTON_STYLE}">Sign in</a></p>
</body>
</html>"#
    )
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invitation_contains_link_and_organization() {
        let html = render_invitation("Transports Amrani", "admin_entreprise", "https://app/invitation/abc", "2026-01-08");
        assert!(html.contains("https://app/invitation/abc"));
        assert!(html.contains("Transports Amrani"));
        assert!(html.contains("2026-01-08"));
    }

    #[test]
    fn organization_names_are_escaped() {
        let html = render_member_added("Bob", "<script>", "https://app");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
