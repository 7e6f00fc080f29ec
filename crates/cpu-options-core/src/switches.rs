//! Host command-line switch parsing.
//!
//! The game accepts switches of the form `-Name:value`.  CPU Options looks at
//! two of them, `-CPUCount` and `-CPUPriority`, but the parser is generic so
//! it can answer "is switch X present, and with what value?" for any name.
//!
//! Accepted spellings:
//!
//! | Argument          | Name       | Value   |
//! |-------------------|------------|---------|
//! | `-CPUCount:2`     | `CPUCount` | `"2"`   |
//! | `-CPUCount=2`     | `CPUCount` | `"2"`   |
//! | `/CPUCount:2`     | `CPUCount` | `"2"`   |
//! | `-IntroOff`       | `IntroOff` | `""`    |
//!
//! The `/` prefix is a Windows convention and is only accepted there; on
//! other targets `/home/u/city.sc4` is a path, not a switch.  Other arguments
//! are positional and ignored.  Names compare case-insensitively and a later
//! occurrence overrides an earlier one.

/// Switch that disables the single-core restriction.
pub const CPU_COUNT_SWITCH: &str = "CPUCount";

/// Switch that overrides the configured priority.
pub const CPU_PRIORITY_SWITCH: &str = "CPUPriority";

/// Parsed switches from a command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLineSwitches {
    switches: Vec<(String, String)>,
}

impl CommandLineSwitches {
    /// Parses switches from an argument list.  The caller decides whether the
    /// program name is included; it is positional and therefore skipped.
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let switches = args
            .into_iter()
            .filter_map(|arg| split_switch(arg.as_ref()))
            .collect();
        Self { switches }
    }

    /// Returns the value of switch `name`, or `None` if it is absent.
    ///
    /// A switch given without a value yields `Some("")`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.switches
            .iter()
            .rev()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.value(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.switches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.switches.is_empty()
    }
}

/// Prefixes that introduce a switch on the compile target.
#[cfg(windows)]
const SWITCH_PREFIXES: &[char] = &['-', '/'];
#[cfg(not(windows))]
const SWITCH_PREFIXES: &[char] = &['-'];

fn split_switch(arg: &str) -> Option<(String, String)> {
    let body = arg.strip_prefix(SWITCH_PREFIXES)?;
    let (name, value) = match body.find([':', '=']) {
        Some(idx) => (&body[..idx], &body[idx + 1..]),
        None => (body, ""),
    };
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
