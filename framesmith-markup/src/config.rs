// Iframe embed configuration model

use crate::error::MarkupError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_DIMENSION: u32 = 100;
pub const MAX_DIMENSION: u32 = 2000;
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

/// Clamp a requested dimension into the supported range.
pub fn clamp_dimension(value: i64) -> u32 {
    value.clamp(MIN_DIMENSION as i64, MAX_DIMENSION as i64) as u32
}

fn invalid(field: &'static str, value: &str, expected: &[&str]) -> MarkupError {
    MarkupError::InvalidValue {
        field,
        value: value.to_string(),
        expected: expected.join(", "),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FrameBorder {
    #[default]
    #[serde(rename = "0")]
    Hidden,
    #[serde(rename = "1")]
    Visible,
}

impl FrameBorder {
    pub const VALUES: [&'static str; 2] = ["0", "1"];

    pub fn as_str(&self) -> &'static str {
        match self {
            FrameBorder::Hidden => "0",
            FrameBorder::Visible => "1",
        }
    }
}

impl FromStr for FrameBorder {
    type Err = MarkupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(FrameBorder::Hidden),
            "1" => Ok(FrameBorder::Visible),
            other => Err(invalid("frameborder", other, &Self::VALUES)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scrolling {
    #[default]
    Auto,
    Yes,
    No,
}

impl Scrolling {
    pub const VALUES: [&'static str; 3] = ["auto", "yes", "no"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scrolling::Auto => "auto",
            Scrolling::Yes => "yes",
            Scrolling::No => "no",
        }
    }
}

impl FromStr for Scrolling {
    type Err = MarkupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Scrolling::Auto),
            "yes" => Ok(Scrolling::Yes),
            "no" => Ok(Scrolling::No),
            _ => Err(invalid("scrolling", s, &Self::VALUES)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loading {
    #[default]
    Eager,
    Lazy,
}

impl Loading {
    pub const VALUES: [&'static str; 2] = ["eager", "lazy"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Loading::Eager => "eager",
            Loading::Lazy => "lazy",
        }
    }
}

impl FromStr for Loading {
    type Err = MarkupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "eager" => Ok(Loading::Eager),
            "lazy" => Ok(Loading::Lazy),
            _ => Err(invalid("loading", s, &Self::VALUES)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferrerPolicy {
    #[default]
    NoReferrerWhenDowngrade,
    NoReferrer,
    Origin,
    OriginWhenCrossOrigin,
    StrictOrigin,
    StrictOriginWhenCrossOrigin,
    UnsafeUrl,
}

impl ReferrerPolicy {
    pub const ALL: [ReferrerPolicy; 7] = [
        ReferrerPolicy::NoReferrerWhenDowngrade,
        ReferrerPolicy::NoReferrer,
        ReferrerPolicy::Origin,
        ReferrerPolicy::OriginWhenCrossOrigin,
        ReferrerPolicy::StrictOrigin,
        ReferrerPolicy::StrictOriginWhenCrossOrigin,
        ReferrerPolicy::UnsafeUrl,
    ];

    pub const VALUES: [&'static str; 7] = [
        "no-referrer-when-downgrade",
        "no-referrer",
        "origin",
        "origin-when-cross-origin",
        "strict-origin",
        "strict-origin-when-cross-origin",
        "unsafe-url",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferrerPolicy::NoReferrerWhenDowngrade => "no-referrer-when-downgrade",
            ReferrerPolicy::NoReferrer => "no-referrer",
            ReferrerPolicy::Origin => "origin",
            ReferrerPolicy::OriginWhenCrossOrigin => "origin-when-cross-origin",
            ReferrerPolicy::StrictOrigin => "strict-origin",
            ReferrerPolicy::StrictOriginWhenCrossOrigin => "strict-origin-when-cross-origin",
            ReferrerPolicy::UnsafeUrl => "unsafe-url",
        }
    }
}

impl FromStr for ReferrerPolicy {
    type Err = MarkupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str() == wanted)
            .ok_or_else(|| invalid("referrerpolicy", s, &Self::VALUES))
    }
}

macro_rules! impl_display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

impl_display_as_str!(FrameBorder, Scrolling, Loading, ReferrerPolicy, SandboxFlag, Permission);

/// Capabilities that can be re-enabled inside a sandboxed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SandboxFlag {
    Scripts,
    Forms,
    Popups,
    SameOrigin,
    TopNavigation,
}

impl SandboxFlag {
    /// Canonical emission order.
    pub const ALL: [SandboxFlag; 5] = [
        SandboxFlag::Scripts,
        SandboxFlag::Forms,
        SandboxFlag::Popups,
        SandboxFlag::SameOrigin,
        SandboxFlag::TopNavigation,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            SandboxFlag::Scripts => "allow-scripts",
            SandboxFlag::Forms => "allow-forms",
            SandboxFlag::Popups => "allow-popups",
            SandboxFlag::SameOrigin => "allow-same-origin",
            SandboxFlag::TopNavigation => "allow-top-navigation",
        }
    }

    /// Short name used on the command line and in the TUI.
    pub fn as_str(&self) -> &'static str {
        match self {
            SandboxFlag::Scripts => "scripts",
            SandboxFlag::Forms => "forms",
            SandboxFlag::Popups => "popups",
            SandboxFlag::SameOrigin => "same-origin",
            SandboxFlag::TopNavigation => "top-navigation",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.token() == token)
    }
}

impl FromStr for SandboxFlag {
    type Err = MarkupError;

    /// Accepts either the short name (`same-origin`) or the attribute token
    /// (`allow-same-origin`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|flag| flag.as_str() == wanted || flag.token() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|f| f.as_str()).collect();
                invalid("sandbox", s, &names)
            })
    }
}

/// Permissions-policy features delegated through the `allow` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Camera,
    Microphone,
    Geolocation,
    Payment,
}

impl Permission {
    /// Canonical emission order.
    pub const ALL: [Permission; 4] = [
        Permission::Camera,
        Permission::Microphone,
        Permission::Geolocation,
        Permission::Payment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Camera => "camera",
            Permission::Microphone => "microphone",
            Permission::Geolocation => "geolocation",
            Permission::Payment => "payment",
        }
    }

    pub fn token(&self) -> &'static str {
        self.as_str()
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.token() == token)
    }
}

impl FromStr for Permission {
    type Err = MarkupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s.trim().to_lowercase().as_str()).ok_or_else(|| {
            let names: Vec<&str> = Self::ALL.iter().map(|p| p.as_str()).collect();
            invalid("allow", s, &names)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxFlags {
    pub scripts: bool,
    pub forms: bool,
    pub popups: bool,
    pub same_origin: bool,
    pub top_navigation: bool,
}

impl SandboxFlags {
    pub fn get(&self, flag: SandboxFlag) -> bool {
        match flag {
            SandboxFlag::Scripts => self.scripts,
            SandboxFlag::Forms => self.forms,
            SandboxFlag::Popups => self.popups,
            SandboxFlag::SameOrigin => self.same_origin,
            SandboxFlag::TopNavigation => self.top_navigation,
        }
    }

    pub fn set(&mut self, flag: SandboxFlag, on: bool) {
        let slot = match flag {
            SandboxFlag::Scripts => &mut self.scripts,
            SandboxFlag::Forms => &mut self.forms,
            SandboxFlag::Popups => &mut self.popups,
            SandboxFlag::SameOrigin => &mut self.same_origin,
            SandboxFlag::TopNavigation => &mut self.top_navigation,
        };
        *slot = on;
    }

    pub fn any(&self) -> bool {
        SandboxFlag::ALL.iter().any(|flag| self.get(*flag))
    }

    /// Active attribute tokens in canonical order.
    pub fn tokens(&self) -> Vec<&'static str> {
        SandboxFlag::ALL
            .iter()
            .filter(|flag| self.get(**flag))
            .map(|flag| flag.token())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PermissionFlags {
    pub camera: bool,
    pub microphone: bool,
    pub geolocation: bool,
    pub payment: bool,
}

impl PermissionFlags {
    pub fn get(&self, permission: Permission) -> bool {
        match permission {
            Permission::Camera => self.camera,
            Permission::Microphone => self.microphone,
            Permission::Geolocation => self.geolocation,
            Permission::Payment => self.payment,
        }
    }

    pub fn set(&mut self, permission: Permission, on: bool) {
        let slot = match permission {
            Permission::Camera => &mut self.camera,
            Permission::Microphone => &mut self.microphone,
            Permission::Geolocation => &mut self.geolocation,
            Permission::Payment => &mut self.payment,
        };
        *slot = on;
    }

    pub fn any(&self) -> bool {
        Permission::ALL.iter().any(|p| self.get(*p))
    }

    /// Active attribute tokens in canonical order.
    pub fn tokens(&self) -> Vec<&'static str> {
        Permission::ALL
            .iter()
            .filter(|p| self.get(**p))
            .map(|p| p.token())
            .collect()
    }
}

/// Everything needed to render one iframe embed.
///
/// Fields are private so the dimension range can't be bypassed; every
/// change goes through one of the named update operations below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    url: String,
    width: u32,
    height: u32,
    border: FrameBorder,
    scrolling: Scrolling,
    fullscreen_allowed: bool,
    loading_mode: Loading,
    referrer_policy: ReferrerPolicy,
    sandbox_flags: SandboxFlags,
    permission_flags: PermissionFlags,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            url: String::new(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            border: FrameBorder::default(),
            scrolling: Scrolling::default(),
            fullscreen_allowed: false,
            loading_mode: Loading::default(),
            referrer_policy: ReferrerPolicy::default(),
            sandbox_flags: SandboxFlags::default(),
            permission_flags: PermissionFlags::default(),
        }
    }
}

impl Configuration {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn border(&self) -> FrameBorder {
        self.border
    }

    pub fn scrolling(&self) -> Scrolling {
        self.scrolling
    }

    pub fn fullscreen_allowed(&self) -> bool {
        self.fullscreen_allowed
    }

    pub fn loading(&self) -> Loading {
        self.loading_mode
    }

    pub fn referrer_policy(&self) -> ReferrerPolicy {
        self.referrer_policy
    }

    pub fn sandbox(&self) -> &SandboxFlags {
        &self.sandbox_flags
    }

    pub fn permissions(&self) -> &PermissionFlags {
        &self.permission_flags
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn set_width(&mut self, width: i64) {
        self.width = clamp_dimension(width);
    }

    pub fn set_height(&mut self, height: i64) {
        self.height = clamp_dimension(height);
    }

    pub fn set_size(&mut self, width: i64, height: i64) {
        self.set_width(width);
        self.set_height(height);
    }

    pub fn set_border(&mut self, border: FrameBorder) {
        self.border = border;
    }

    pub fn set_scrolling(&mut self, scrolling: Scrolling) {
        self.scrolling = scrolling;
    }

    pub fn set_fullscreen(&mut self, allowed: bool) {
        self.fullscreen_allowed = allowed;
    }

    pub fn set_loading(&mut self, loading: Loading) {
        self.loading_mode = loading;
    }

    pub fn set_referrer_policy(&mut self, policy: ReferrerPolicy) {
        self.referrer_policy = policy;
    }

    pub fn set_sandbox(&mut self, flag: SandboxFlag, on: bool) {
        self.sandbox_flags.set(flag, on);
    }

    /// Replace the whole sandbox set at once.
    pub fn set_sandbox_flags(&mut self, flags: SandboxFlags) {
        self.sandbox_flags = flags;
    }

    pub fn set_permission(&mut self, permission: Permission, on: bool) {
        self.permission_flags.set(permission, on);
    }

    pub fn set_permission_flags(&mut self, flags: PermissionFlags) {
        self.permission_flags = flags;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Configuration::default();
        assert_eq!(config.url(), "");
        assert_eq!(config.width(), 800);
        assert_eq!(config.height(), 600);
        assert_eq!(config.border(), FrameBorder::Hidden);
        assert_eq!(config.scrolling(), Scrolling::Auto);
        assert_eq!(config.loading(), Loading::Eager);
        assert_eq!(
            config.referrer_policy(),
            ReferrerPolicy::NoReferrerWhenDowngrade
        );
        assert!(!config.fullscreen_allowed());
        assert!(!config.sandbox().any());
        assert!(!config.permissions().any());
    }

    #[test]
    fn test_dimensions_are_clamped() {
        let mut config = Configuration::default();
        config.set_size(50, 5000);
        assert_eq!(config.width(), MIN_DIMENSION);
        assert_eq!(config.height(), MAX_DIMENSION);

        config.set_width(-20);
        assert_eq!(config.width(), MIN_DIMENSION);

        config.set_height(450);
        assert_eq!(config.height(), 450);
    }

    #[test]
    fn test_sandbox_tokens_follow_canonical_order() {
        let mut flags = SandboxFlags::default();
        flags.set(SandboxFlag::TopNavigation, true);
        flags.set(SandboxFlag::Scripts, true);
        flags.set(SandboxFlag::SameOrigin, true);

        assert_eq!(
            flags.tokens(),
            vec!["allow-scripts", "allow-same-origin", "allow-top-navigation"]
        );
    }

    #[test]
    fn test_permission_tokens_follow_canonical_order() {
        let mut flags = PermissionFlags::default();
        flags.set(Permission::Payment, true);
        flags.set(Permission::Camera, true);

        assert_eq!(flags.tokens(), vec!["camera", "payment"]);
    }

    #[test]
    fn test_parse_enumerated_values() {
        assert_eq!("1".parse::<FrameBorder>().unwrap(), FrameBorder::Visible);
        assert_eq!("NO".parse::<Scrolling>().unwrap(), Scrolling::No);
        assert_eq!("lazy".parse::<Loading>().unwrap(), Loading::Lazy);
        assert_eq!(
            "strict-origin-when-cross-origin"
                .parse::<ReferrerPolicy>()
                .unwrap(),
            ReferrerPolicy::StrictOriginWhenCrossOrigin
        );
        assert_eq!(
            "allow-same-origin".parse::<SandboxFlag>().unwrap(),
            SandboxFlag::SameOrigin
        );
        assert_eq!(
            "same-origin".parse::<SandboxFlag>().unwrap(),
            SandboxFlag::SameOrigin
        );
        assert_eq!(
            "geolocation".parse::<Permission>().unwrap(),
            Permission::Geolocation
        );
    }

    #[test]
    fn test_parse_rejects_unknown_values() {
        let err = "sideways".parse::<Scrolling>().unwrap_err();
        assert!(matches!(err, MarkupError::InvalidValue { field: "scrolling", .. }));
        assert!(err.to_string().contains("auto, yes, no"));

        assert!("2".parse::<FrameBorder>().is_err());
        assert!("allow-modals".parse::<SandboxFlag>().is_err());
        assert!("usb".parse::<Permission>().is_err());
    }

    #[test]
    fn test_display_matches_attribute_values() {
        assert_eq!(FrameBorder::Visible.to_string(), "1");
        assert_eq!(ReferrerPolicy::UnsafeUrl.to_string(), "unsafe-url");
        assert_eq!(SandboxFlag::TopNavigation.to_string(), "top-navigation");
        assert_eq!(Permission::Microphone.to_string(), "microphone");
    }
}
