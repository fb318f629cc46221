use crate::constants::ssh::{KEY_IDENTITY_FILE, KEY_PORT, WILDCARD_PATTERN};
use crate::errors::SyncError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostBlock {
    pub patterns: Vec<String>,
    pub directives: Vec<(String, String)>,
    pub raw_text: String,
}

impl HostBlock {
    pub fn identifier(&self) -> &str {
        self.patterns.first().map(String::as_str).unwrap_or("")
    }

    pub fn directive(&self, key: &str) -> Option<&str> {
        self.directives
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn port(&self) -> Option<&str> {
        self.directive(KEY_PORT)
    }

    pub fn is_owned(&self, private_key_path: &str) -> bool {
        if self.identifier() == WILDCARD_PATTERN {
            return false;
        }
        self.directives
            .iter()
            .any(|(k, v)| k.eq_ignore_ascii_case(KEY_IDENTITY_FILE) && v == private_key_path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SshConfigText {
    pub preamble: String,
    pub blocks: Vec<HostBlock>,
}

pub fn parse(text: &str) -> Result<SshConfigText, SyncError> {
    let mut parsed = SshConfigText::default();
    let mut current: Option<HostBlock> = None;

    for raw_line in text.split_inclusive('\n') {
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            match current.as_mut() {
                Some(block) => block.raw_text.push_str(raw_line),
                None => parsed.preamble.push_str(raw_line),
            }
            continue;
        }

        let (key, value) = split_directive(trimmed).ok_or_else(|| {
            SyncError::malformed_config(format!("Cannot tokenize config line: {:?}", trimmed))
        })?;

        if key.eq_ignore_ascii_case("host") {
            if let Some(done) = current.take() {
                parsed.blocks.push(done);
            }
            current = Some(HostBlock {
                patterns: value.split_whitespace().map(str::to_string).collect(),
                directives: Vec::new(),
                raw_text: raw_line.to_string(),
            });
        } else {
            match current.as_mut() {
                Some(block) => {
                    block.directives.push((key, value.to_string()));
                    block.raw_text.push_str(raw_line);
                }
                None => parsed.preamble.push_str(raw_line),
            }
        }
    }
    if let Some(done) = current.take() {
        parsed.blocks.push(done);
    }
    Ok(parsed)
}

fn split_directive(line: &str) -> Option<(String, String)> {
    let sep = line.find(|c: char| c.is_whitespace() || c == '=')?;
    let (key, rest) = line.split_at(sep);
    let mut value = rest.trim_start();
    if let Some(stripped) = value.strip_prefix('=') {
        value = stripped.trim_start();
    }
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}
