//! Prompt recognition and output cleanup for switch CLIs.

use once_cell::sync::Lazy;
use regex::bytes::Regex;

/// Any exec, privileged, or configuration prompt of the supported CLIs.
///
/// ```text
/// switch>                          # user exec
/// leaf-1#                          # privileged exec
/// switch(config-if-Et1)#           # configuration sub-mode
/// switch [standalone: master] >    # Onyx
/// * X670-G2.1 #                    # EXOS, '*' marks unsaved config
/// ```
pub static PROMPT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[\w.\-@()/:\[\]* ]{1,80}[>#]\s?$").expect("prompt pattern is valid")
});

/// Password request printed after `enable`.
pub static PASSWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mi)password:\s?$").expect("password pattern is valid"));

/// Prompt or password request, used while escalating.
pub static PROMPT_OR_PASSWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)(^[\w.\-@()/:\[\]* ]{1,80}[>#]\s?$)|(password:\s?$)")
        .expect("escalation pattern is valid")
});

/// Whether the last line of `output` is an unprivileged (`>`) prompt.
pub fn is_user_exec(output: &str) -> bool {
    output
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .is_some_and(|line| line.trim_end().ends_with('>'))
}

/// Strip the echoed command and the trailing prompt from raw shell output.
pub fn normalize_output(raw: &str, command: &str) -> String {
    let raw = raw.replace('\r', "");
    let output = match raw.find(command) {
        Some(pos) if raw[..pos].trim().is_empty() => &raw[pos + command.len()..],
        _ => raw.as_str(),
    };
    let output = output.trim_start_matches('\n');

    match output.rfind('\n') {
        Some(pos) => output[..pos].to_string(),
        None if PROMPT.is_match(output.as_bytes()) => String::new(),
        None => output.to_string(),
    }
}
