//! Control command construction.
//!
//! The simulator host runs the posted command line verbatim, so the token
//! order below is the wire contract:
//!
//! ```text
//! <launcher> "<scenario> <base-flag> --<name>=<value> ... "
//! ```
//!
//! Every token after the scenario carries one trailing space. When the
//! `flags` option is off the quoted part is only the scenario.

use crate::error::ControllerError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Base flag selecting telemetry through the external RIC controller.
pub const FLEXRIC_FLAG: &str = "--E2andLogging=1";

/// Base flag selecting file logging only.
pub const FILE_LOGGING_FLAG: &str = "--enableE2FileLogging=1";

/// One recognized `--name=value` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionRule {
    /// Flag name as the scenario binary expects it
    pub name: &'static str,
    /// Value injected when the option is absent
    pub default: Option<&'static str>,
}

impl OptionRule {
    const fn plain(name: &'static str) -> Self {
        Self { name, default: None }
    }

    const fn with_default(name: &'static str, default: &'static str) -> Self {
        Self { name, default: Some(default) }
    }

    /// Value this rule contributes for `options`, if any.
    pub fn value<'a>(&self, options: &'a StartOptions) -> Option<&'a str> {
        options.get(self.name).or(self.default)
    }
}

/// Recognized options, in emission order.
pub const OPTION_RULES: &[OptionRule] = &[
    OptionRule::plain("e2TermIp"),
    OptionRule::plain("hoSinrDifference"),
    OptionRule::plain("indicationPeriodicity"),
    OptionRule::with_default("simTime", "100"),
    OptionRule::plain("KPM_E2functionID"),
    OptionRule::plain("RC_E2functionID"),
    OptionRule::plain("N_MmWaveEnbNodes"),
    OptionRule::plain("N_Ues"),
    OptionRule::plain("CenterFrequency"),
    OptionRule::plain("Bandwidth"),
    OptionRule::plain("N_AntennasMcUe"),
    OptionRule::plain("N_AntennasMmWave"),
    OptionRule::plain("IntersideDistanceUEs"),
    OptionRule::plain("IntersideDistanceCells"),
];

/// Options accompanying a start request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartOptions {
    /// Append `--name=value` tokens at all
    pub flags: bool,
    /// Route telemetry through the external RIC controller
    pub flexric: bool,
    values: BTreeMap<String, String>,
}

impl StartOptions {
    pub fn new(flags: bool, flexric: bool) -> Self {
        Self {
            flags,
            flexric,
            values: BTreeMap::new(),
        }
    }

    /// Sets an option value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Reads options from a dashboard form.
    ///
    /// `flags` and `flexric` are on only for `"true"` (or JSON `true`).
    /// Strings and numbers become option values; `null` counts as absent.
    pub fn from_form(form: &Map<String, Value>) -> Self {
        let mut options = Self::new(is_true(form.get("flags")), is_true(form.get("flexric")));

        for (name, value) in form {
            if matches!(name.as_str(), "flags" | "flexric" | "scenario") {
                continue;
            }
            if let Some(text) = form_text(value) {
                options.values.insert(name.clone(), text);
            }
        }

        options
    }

    /// Base flag selected by `flexric`.
    pub fn base_flag(&self) -> &'static str {
        if self.flexric {
            FLEXRIC_FLAG
        } else {
            FILE_LOGGING_FLAG
        }
    }
}

fn is_true(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => s == "true",
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}

/// Renders a form value the way the scenario binary expects it.
pub(crate) fn form_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Builds the command line sent over the control channel.
///
/// Rejects input that could break out of the quoted invocation on the
/// simulator host.
pub fn build_control_command(
    launcher: &str,
    scenario_path: &str,
    options: &StartOptions,
) -> Result<String, ControllerError> {
    check_shell_safe("scenario", scenario_path)?;

    if !options.flags {
        return Ok(format!("{} \"{}\"", launcher, scenario_path));
    }

    let mut arguments = String::new();
    arguments.push_str(options.base_flag());
    arguments.push(' ');

    for rule in OPTION_RULES {
        if let Some(value) = rule.value(options) {
            check_shell_safe(rule.name, value)?;
            arguments.push_str(&format!("--{}={} ", rule.name, value));
        }
    }

    Ok(format!("{} \"{} {}\"", launcher, scenario_path, arguments))
}

/// Scenario name as the stop channel addresses it: the file name up to the
/// first dot (`scratch/scenario-one.cc` -> `scenario-one`).
///
/// A file name starting with a dot (`scratch/.hidden.cc`) has no such
/// prefix; the whole file name is used instead so the stop channel never
/// receives an empty name.
pub fn scenario_name(scenario_path: &str) -> String {
    let file_name = Path::new(scenario_path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(scenario_path);

    match file_name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}

fn check_shell_safe(field: &str, value: &str) -> Result<(), ControllerError> {
    const FORBIDDEN: &[char] = &['"', '\'', '`', '$', '\\', '\n', '\r'];
    if value.contains(FORBIDDEN) {
        return Err(ControllerError::invalid(format!(
            "{} contains characters not allowed in a command line: {:?}",
            field, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LAUNCHER: &str = "./waf --run";

    fn form(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_flags_off_sends_bare_scenario() {
        let options = StartOptions::new(false, true)
            .with("simTime", "50")
            .with("N_Ues", "4");
        let command = build_control_command(LAUNCHER, "scratch/scenario-one.cc", &options).unwrap();

        assert_eq!(command, "./waf --run \"scratch/scenario-one.cc\"");
    }

    #[test]
    fn test_flexric_flag() {
        let options = StartOptions::new(true, true);
        let command = build_control_command(LAUNCHER, "scratch/scenario-one.cc", &options).unwrap();

        assert!(command.contains("--E2andLogging=1"));
        assert!(!command.contains("--enableE2FileLogging=1"));
    }

    #[test]
    fn test_file_logging_flag() {
        let options = StartOptions::new(true, false);
        let command = build_control_command(LAUNCHER, "scratch/scenario-one.cc", &options).unwrap();

        assert!(command.contains("--enableE2FileLogging=1"));
        assert!(!command.contains("--E2andLogging=1"));
    }

    #[test]
    fn test_sim_time_default() {
        let options = StartOptions::new(true, false);
        let command = build_control_command(LAUNCHER, "scratch/scenario-one.cc", &options).unwrap();

        assert_eq!(
            command,
            "./waf --run \"scratch/scenario-one.cc --enableE2FileLogging=1 --simTime=100 \""
        );
    }

    #[test]
    fn test_declared_order_wins_over_input_order() {
        let options = StartOptions::new(true, false)
            .with("IntersideDistanceCells", "1000")
            .with("e2TermIp", "10.0.2.10")
            .with("simTime", "20")
            .with("N_Ues", "3");
        let command =
            build_control_command(LAUNCHER, "scratch/scenario-zero.cc", &options).unwrap();

        assert_eq!(
            command,
            "./waf --run \"scratch/scenario-zero.cc --enableE2FileLogging=1 \
             --e2TermIp=10.0.2.10 --simTime=20 --N_Ues=3 --IntersideDistanceCells=1000 \""
        );
    }

    #[test]
    fn test_unknown_options_ignored() {
        let options = StartOptions::new(true, false).with("N_LteEnbNodes", "2");
        let command = build_control_command(LAUNCHER, "s.cc", &options).unwrap();

        assert!(!command.contains("N_LteEnbNodes"));
    }

    #[test]
    fn test_rejects_quote_injection() {
        let options = StartOptions::new(true, false).with("e2TermIp", "1.2.3.4\"; rm -rf /");
        let err = build_control_command(LAUNCHER, "s.cc", &options).unwrap_err();
        assert!(matches!(err, ControllerError::InvalidParameter(_)));

        let plain = StartOptions::new(false, false);
        assert!(build_control_command(LAUNCHER, "s.cc$(reboot)", &plain).is_err());
    }

    #[test]
    fn test_options_from_form() {
        let options = StartOptions::from_form(&form(json!({
            "scenario": "scratch/scenario-one.cc",
            "flags": "true",
            "flexric": "false",
            "simTime": 30,
            "e2TermIp": "10.0.2.10",
            "Bandwidth": null
        })));

        assert!(options.flags);
        assert!(!options.flexric);
        assert_eq!(options.get("simTime"), Some("30"));
        assert_eq!(options.get("e2TermIp"), Some("10.0.2.10"));
        assert_eq!(options.get("Bandwidth"), None);
        assert_eq!(options.get("scenario"), None);
    }

    #[test]
    fn test_flags_require_literal_true() {
        let options = StartOptions::from_form(&form(json!({"flags": "yes", "flexric": true})));
        assert!(!options.flags);
        assert!(options.flexric);
    }

    #[test]
    fn test_scenario_name() {
        assert_eq!(scenario_name("scratch/scenario-one.cc"), "scenario-one");
        assert_eq!(scenario_name("scenario-zero.cc"), "scenario-zero");
        assert_eq!(scenario_name("/abs/dir/run.v2.cc"), "run");
        assert_eq!(scenario_name("plain"), "plain");
        assert_eq!(scenario_name("scratch/.hidden.cc"), ".hidden.cc");
    }
}
