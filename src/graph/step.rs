use super::definition::{Node, NodeKind};
use super::fields::{Fields, choice_key};

/// A node decoded into its kind-specific, typed form.
///
/// Decoding never fails: missing fields take their documented defaults and unrecognised
/// enumerated values are kept as `Unrecognized` so the emitters can report them.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    EntryPoint(EntryStep),
    ElementDescriptor(ElementStep),
    Interact(InteractStep),
    Assert(AssertStep),
    Branch(Check),
    Repeat(RepeatStep),
    Delay(DelayStep),
    Capture(CaptureStep),
    SetVariable(SetVariableStep),
    NetworkRule(NetworkRuleStep),
    LoadFixture(LoadFixtureStep),
    CustomCall(CustomCallStep),
}

impl Step {
    pub fn from_node(node: &Node) -> Self {
        let f = Fields(&node.data);
        match node.kind {
            NodeKind::EntryPoint => Step::EntryPoint(EntryStep::from_fields(f)),
            NodeKind::ElementDescriptor => Step::ElementDescriptor(ElementStep::from_fields(f)),
            NodeKind::Interact => Step::Interact(InteractStep {
                action: Action::parse(f.choice("action")),
                value: f.text_or("value", ""),
                save_to: f.text("saveTo"),
            }),
            NodeKind::Assert => Step::Assert(AssertStep {
                check: Check::from_fields(f),
                verbose: f.flag("printResults"),
            }),
            NodeKind::Branch => Step::Branch(Check::from_fields(f)),
            NodeKind::Repeat => Step::Repeat(RepeatStep {
                mode: RepeatMode::parse(f.text("loopType")),
                count: f.text_or("count", "1"),
                condition: Condition::parse(f.choice("condition")),
            }),
            NodeKind::Delay => Step::Delay(DelayStep::from_fields(f)),
            NodeKind::Capture => Step::Capture(CaptureStep {
                directory: f.text_or("directory", "./screenshots"),
                filename: f.text_or("filename", "screenshot"),
                counter: f.flag("autoIncrement"),
            }),
            NodeKind::SetVariable => Step::SetVariable(SetVariableStep {
                name: f.text_or("varName", "my_var"),
                value: f.text_or("varValue", ""),
            }),
            NodeKind::NetworkRule => Step::NetworkRule(NetworkRuleStep {
                method: f.text_or("method", "GET").to_ascii_uppercase(),
                url_pattern: f.text_or("urlPattern", "**/api/*"),
                alias: f.text_or("alias", "request"),
                mock: f.flag("mockResponse").then(|| MockResponse {
                    status: f.text_or("statusCode", "200"),
                    body: f.text_or("responseBody", "{}"),
                }),
            }),
            NodeKind::LoadFixture => Step::LoadFixture(LoadFixtureStep {
                path: f.text_or("filePath", "data.json"),
                name: f.text_or("varName", "fixtureData"),
            }),
            NodeKind::CustomCall => Step::CustomCall(CustomCallStep {
                command: f.text("commandName").map(|c| c.trim().to_string()),
                arguments: f
                    .text("arguments")
                    .map(|raw| {
                        raw.split(',')
                            .map(str::trim)
                            .filter(|a| !a.is_empty())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
            }),
        }
    }
}

/// Root of one test case.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryStep {
    pub test_name: Option<String>,
    pub browser: String,
    pub url: String,
    /// Per-entry backend override, used when exporting one file per test case.
    pub framework: Option<String>,
    pub clear_cookies: bool,
    pub clear_local_storage: bool,
    pub clear_session_storage: bool,
}

impl EntryStep {
    pub(crate) fn from_fields(f: Fields<'_>) -> Self {
        Self {
            test_name: f.text("testName").map(|n| n.trim().to_string()),
            browser: f.text_or("browser", "Chrome"),
            url: f.text_or("url", "https://example.com"),
            framework: f.text("framework"),
            clear_cookies: f.flag("clearCookies"),
            clear_local_storage: f.flag("clearLocalStorage"),
            clear_session_storage: f.flag("clearSessionStorage"),
        }
    }

    pub fn from_node(node: &Node) -> Self {
        Self::from_fields(Fields(&node.data))
    }
}

/// Describes how to locate a page element. Consumed through `dataIn` edges only.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementStep {
    pub name: String,
    pub locator: LocatorKind,
    pub value: String,
    /// The `selectorType` text when it named no known strategy and `locator` fell back to ID.
    pub unrecognized_locator: Option<String>,
}

impl ElementStep {
    pub(crate) fn from_fields(f: Fields<'_>) -> Self {
        let selector_type = f.text("selectorType");
        let locator = selector_type.as_deref().map(LocatorKind::parse);
        Self {
            name: f.text_or("name", "element"),
            locator: locator.flatten().unwrap_or_default(),
            value: f.text_or("selectorValue", ""),
            unrecognized_locator: selector_type
                .filter(|_| locator == Some(None))
                .map(|raw| raw.trim().to_string()),
        }
    }

    pub fn from_node(node: &Node) -> Self {
        Self::from_fields(Fields(&node.data))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LocatorKind {
    #[default]
    Id,
    Css,
    XPath,
    Name,
    LinkText,
}

impl LocatorKind {
    fn parse(raw: &str) -> Option<Self> {
        match choice_key(raw).as_str() {
            "id" => Some(LocatorKind::Id),
            "css" | "cssselector" => Some(LocatorKind::Css),
            "xpath" => Some(LocatorKind::XPath),
            "name" => Some(LocatorKind::Name),
            "linktext" | "link" => Some(LocatorKind::LinkText),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteractStep {
    pub action: Action,
    pub value: String,
    /// Destination variable for [`Action::CaptureText`].
    pub save_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Click,
    Type,
    Clear,
    Hover,
    CaptureText,
    Unrecognized(String),
}

impl Action {
    fn parse(key: Option<String>) -> Self {
        match key.as_deref() {
            None | Some("click") => Action::Click,
            Some("type") | Some("sendkeys") | Some("typesendkeys") => Action::Type,
            Some("clear") => Action::Clear,
            Some("hover") => Action::Hover,
            Some("gettext") | Some("capturetext") | Some("gettextsavetovar") => Action::CaptureText,
            Some(other) => Action::Unrecognized(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Action::Click => "Click",
            Action::Type => "Type",
            Action::Clear => "Clear",
            Action::Hover => "Hover",
            Action::CaptureText => "Get Text",
            Action::Unrecognized(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssertStep {
    pub check: Check,
    /// Log passing checks too, not only failures.
    pub verbose: bool,
}

/// The condition vocabulary shared by Assert and Branch steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub condition: Condition,
    pub value: String,
    pub property: String,
    pub network_alias: String,
    pub expected_status: String,
}

impl Check {
    pub(crate) fn from_fields(f: Fields<'_>) -> Self {
        Self {
            condition: Condition::parse(f.choice("condition")),
            value: f.text_or("value", ""),
            property: f.text_or("propertyName", "value"),
            network_alias: f.text_or("networkAlias", "request"),
            expected_status: f.text_or("expectedStatus", "200"),
        }
    }

    /// The value as a regular expression body, with `/.../` delimiters removed.
    pub fn pattern(&self) -> &str {
        let v = self.value.trim();
        if v.len() >= 2 && v.starts_with('/') && v.ends_with('/') {
            &v[1..v.len() - 1]
        } else {
            v
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Visible,
    ContainsText,
    UrlContains,
    UrlMatchesPattern,
    HasClass,
    PropertyEquals,
    NetworkStatus,
    Unrecognized(String),
}

impl Condition {
    fn parse(key: Option<String>) -> Self {
        match key.as_deref() {
            None | Some("visible") | Some("isvisible") | Some("iselementvisible") => {
                Condition::Visible
            }
            Some("containstext") | Some("elementcontainstext") => Condition::ContainsText,
            Some("urlcontains") => Condition::UrlContains,
            Some("urlmatchespattern") | Some("urlmatchesregex") => Condition::UrlMatchesPattern,
            Some("hasclass") | Some("elementhasclass") => Condition::HasClass,
            Some("propertyequals") | Some("elementpropertyequals") => Condition::PropertyEquals,
            Some("networkstatus") | Some("networkresponsestatus") => Condition::NetworkStatus,
            Some(other) => Condition::Unrecognized(other.to_string()),
        }
    }

    /// Whether the condition inspects an element supplied through a `dataIn` edge.
    pub fn needs_element(&self) -> bool {
        matches!(
            self,
            Condition::Visible
                | Condition::ContainsText
                | Condition::HasClass
                | Condition::PropertyEquals
        )
    }

    pub fn label(&self) -> &str {
        match self {
            Condition::Visible => "Is Visible",
            Condition::ContainsText => "Contains Text",
            Condition::UrlContains => "URL Contains",
            Condition::UrlMatchesPattern => "URL Matches Regex",
            Condition::HasClass => "Has Class",
            Condition::PropertyEquals => "Property Equals",
            Condition::NetworkStatus => "Network Status",
            Condition::Unrecognized(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepeatStep {
    pub mode: RepeatMode,
    /// Raw iteration count, translated as an expression in `Counter` mode.
    pub count: String,
    /// Guard condition in `While` mode.
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepeatMode {
    Counter,
    While,
    /// Emitted as `Counter`.
    Unrecognized(String),
}

impl RepeatMode {
    fn parse(raw: Option<String>) -> Self {
        let Some(raw) = raw else {
            return RepeatMode::Counter;
        };
        match choice_key(&raw).as_str() {
            "counter" | "count" | "times" => RepeatMode::Counter,
            "while" | "whilecondition" => RepeatMode::While,
            _ => RepeatMode::Unrecognized(raw.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DelayStep {
    /// Sleep for a duration in seconds (an expression).
    Time { duration: String },
    /// Wait for an intercepted request registered under an alias.
    Network { alias: String },
    /// A `waitType` outside the vocabulary. Emitted as a timed sleep.
    Unrecognized { wait_type: String, duration: String },
}

impl DelayStep {
    fn from_fields(f: Fields<'_>) -> Self {
        let duration = || f.text_or("duration", "1");
        let Some(raw) = f.text("waitType") else {
            return DelayStep::Time { duration: duration() };
        };
        match choice_key(&raw).as_str() {
            "time" | "timeseconds" | "duration" => DelayStep::Time { duration: duration() },
            "network" | "networkalias" | "networkaliascypress" => DelayStep::Network {
                alias: f.text_or("networkAlias", "request"),
            },
            _ => DelayStep::Unrecognized {
                wait_type: raw.trim().to_string(),
                duration: duration(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptureStep {
    pub directory: String,
    pub filename: String,
    /// Append a per-test counter to the file name.
    pub counter: bool,
}

impl CaptureStep {
    /// Directory without a trailing slash.
    pub fn directory(&self) -> &str {
        let trimmed = self.directory.trim().trim_end_matches('/');
        if trimmed.is_empty() { "." } else { trimmed }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetVariableStep {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkRuleStep {
    pub method: String,
    pub url_pattern: String,
    pub alias: String,
    pub mock: Option<MockResponse>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockResponse {
    pub status: String,
    pub body: String,
}

impl MockResponse {
    /// The body re-serialized as compact JSON, or `{}` when it is not valid JSON.
    pub fn json_body(&self) -> String {
        serde_json::from_str::<serde_json::Value>(&self.body)
            .map(|v| v.to_string())
            .unwrap_or_else(|_| "{}".to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadFixtureStep {
    pub path: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomCallStep {
    /// `None` lets the backend pick its conventional placeholder name.
    pub command: Option<String>,
    /// Comma-split, trimmed, empty entries dropped.
    pub arguments: Vec<String>,
}

