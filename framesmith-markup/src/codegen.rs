// Iframe markup generation

use crate::config::{Configuration, Loading, ReferrerPolicy, Scrolling};

/// Render the copyable `<iframe>` tag for a configuration.
///
/// Attributes that sit at their defaults are left out, except `frameborder`
/// which is always written. An empty URL produces an empty string. The URL is
/// placed inside double quotes as-is; nothing is escaped.
pub fn generate_iframe(config: &Configuration) -> String {
    if config.url().is_empty() {
        return String::new();
    }

    let mut attributes = vec![
        format!("src=\"{}\"", config.url()),
        format!("width=\"{}\"", config.width()),
        format!("height=\"{}\"", config.height()),
        format!("frameborder=\"{}\"", config.border()),
    ];

    if config.scrolling() != Scrolling::Auto {
        attributes.push(format!("scrolling=\"{}\"", config.scrolling()));
    }

    if config.fullscreen_allowed() {
        attributes.push("allowfullscreen".to_string());
    }

    if config.loading() != Loading::Eager {
        attributes.push(format!("loading=\"{}\"", config.loading()));
    }

    if config.referrer_policy() != ReferrerPolicy::default() {
        attributes.push(format!("referrerpolicy=\"{}\"", config.referrer_policy()));
    }

    let sandbox = config.sandbox().tokens();
    if !sandbox.is_empty() {
        attributes.push(format!("sandbox=\"{}\"", sandbox.join(" ")));
    }

    let allow = config.permissions().tokens();
    if !allow.is_empty() {
        attributes.push(format!("allow=\"{}\"", allow.join("; ")));
    }

    format!("<iframe {}></iframe>", attributes.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FrameBorder, Permission, SandboxFlag};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_url_generates_nothing() {
        assert_eq!(generate_iframe(&Configuration::default()), "");
    }

    #[test]
    fn test_defaults_only_emit_required_attributes() {
        let config = Configuration::new("https://example.com");
        assert_eq!(
            generate_iframe(&config),
            r#"<iframe src="https://example.com" width="800" height="600" frameborder="0"></iframe>"#
        );
    }

    #[test]
    fn test_sandboxed_embed() {
        let mut config = Configuration::new("https://example.com");
        config.set_size(450, 790);
        config.set_sandbox(SandboxFlag::Scripts, true);
        config.set_sandbox(SandboxFlag::Forms, true);

        assert_eq!(
            generate_iframe(&config),
            r#"<iframe src="https://example.com" width="450" height="790" frameborder="0" sandbox="allow-scripts allow-forms"></iframe>"#
        );
    }

    #[test]
    fn test_every_attribute_in_fixed_order() {
        let mut config = Configuration::new("https://widgets.example.com/embed");
        config.set_size(1024, 768);
        config.set_border(FrameBorder::Visible);
        config.set_scrolling(Scrolling::No);
        config.set_fullscreen(true);
        config.set_loading(Loading::Lazy);
        config.set_referrer_policy(ReferrerPolicy::StrictOrigin);
        config.set_sandbox(SandboxFlag::TopNavigation, true);
        config.set_sandbox(SandboxFlag::Popups, true);
        config.set_permission(Permission::Payment, true);
        config.set_permission(Permission::Microphone, true);

        assert_eq!(
            generate_iframe(&config),
            concat!(
                r#"<iframe src="https://widgets.example.com/embed" width="1024" height="768" "#,
                r#"frameborder="1" scrolling="no" allowfullscreen loading="lazy" "#,
                r#"referrerpolicy="strict-origin" sandbox="allow-popups allow-top-navigation" "#,
                r#"allow="microphone; payment"></iframe>"#
            )
        );
    }

    #[test]
    fn test_src_width_height_appear_exactly_once() {
        let mut config = Configuration::new("https://example.com/?w=1&h=2");
        config.set_size(300, 250);
        config.set_permission(Permission::Camera, true);
        let markup = generate_iframe(&config);

        assert_eq!(markup.matches(" src=").count(), 1);
        assert_eq!(markup.matches(" width=").count(), 1);
        assert_eq!(markup.matches(" height=").count(), 1);
        assert!(markup.contains(r#"width="300""#));
        assert!(markup.contains(r#"height="250""#));
    }

    #[test]
    fn test_default_values_never_emitted() {
        let markup = generate_iframe(&Configuration::new("https://example.com"));
        assert!(markup.contains(r#"frameborder="0""#));
        assert!(!markup.contains("scrolling"));
        assert!(!markup.contains("loading"));
        assert!(!markup.contains("referrerpolicy"));
        assert!(!markup.contains("sandbox"));
        assert!(!markup.contains("allow"));
    }
}
