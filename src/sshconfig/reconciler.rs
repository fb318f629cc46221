use crate::constants::ports::ALLOCATION_FLOOR;
use crate::constants::ssh::{WORKSPACE_HOSTNAME, WORKSPACE_USER};
use crate::errors::SyncError;
use crate::sshconfig::parser::{self, HostBlock};
use crate::sshconfig::ports::allocate_free_port;
use std::collections::{BTreeSet, HashSet};

pub struct Reconciler {
    private_key_path: String,
}

impl Reconciler {
    pub fn new(private_key_path: impl Into<String>) -> Self {
        Self {
            private_key_path: private_key_path.into(),
        }
    }

    pub fn private_key_path(&self) -> &str {
        &self.private_key_path
    }

    pub fn sync(
        &self,
        raw_config: &str,
        active_identifiers: &[String],
    ) -> Result<String, SyncError> {
        let parsed = parser::parse(raw_config)?;
        let (owned, foreign): (Vec<&HostBlock>, Vec<&HostBlock>) = parsed
            .blocks
            .iter()
            .partition(|block| block.is_owned(&self.private_key_path));

        let mut retained = Vec::new();
        let mut used_ports: HashSet<String> = HashSet::new();
        for block in owned {
            if active_identifiers.iter().any(|id| id == block.identifier()) {
                if let Some(port) = block.port() {
                    used_ports.insert(port.to_string());
                }
                retained.push(block);
            }
        }

        let mut output = String::with_capacity(raw_config.len());
        output.push_str(&parsed.preamble);
        for block in &foreign {
            append_block(&mut output, &block.raw_text);
        }
        for block in &retained {
            append_block(&mut output, &block.raw_text);
        }

        let retained_ids: HashSet<&str> =
            retained.iter().map(|block| block.identifier()).collect();
        let mut created: HashSet<&str> = HashSet::new();
        for identifier in active_identifiers {
            if retained_ids.contains(identifier.as_str()) || !created.insert(identifier.as_str()) {
                continue;
            }
            let port = allocate_free_port(&used_ports, ALLOCATION_FLOOR)?;
            used_ports.insert(port.to_string());
            append_block(
                &mut output,
                &render_entry(identifier, port, &self.private_key_path),
            );
        }
        Ok(output)
    }

    pub fn owned_identifiers(&self, raw_config: &str) -> Result<Vec<String>, SyncError> {
        let parsed = parser::parse(raw_config)?;
        Ok(parsed
            .blocks
            .iter()
            .filter(|block| block.is_owned(&self.private_key_path))
            .map(|block| block.identifier().to_string())
            .collect())
    }

    pub fn used_ports(&self, raw_config: &str) -> Result<BTreeSet<String>, SyncError> {
        let parsed = parser::parse(raw_config)?;
        Ok(parsed
            .blocks
            .iter()
            .filter(|block| block.is_owned(&self.private_key_path))
            .filter_map(|block| block.port().map(str::to_string))
            .collect())
    }

    pub fn configured_port(
        &self,
        raw_config: &str,
        identifier: &str,
    ) -> Result<Option<String>, SyncError> {
        let parsed = parser::parse(raw_config)?;
        Ok(parsed
            .blocks
            .iter()
            .find(|block| {
                block.is_owned(&self.private_key_path) && block.identifier() == identifier
            })
            .and_then(|block| block.port().map(str::to_string)))
    }
}

fn append_block(output: &mut String, raw_text: &str) {
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
    output.push_str(raw_text);
}

fn render_entry(alias: &str, port: u16, private_key_path: &str) -> String {
    format!(
        "Host {}\n  Hostname {}\n  IdentityFile {}\n  User {}\n  Port {}\n\n",
        alias, WORKSPACE_HOSTNAME, private_key_path, WORKSPACE_USER, port
    )
}

#[cfg(test)]
mod tests {
    use super::Reconciler;
    use crate::errors::SyncErrorKind;

    const KEY: &str = "/k.pem";

    fn active(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    fn owned_entry(alias: &str, port: u16) -> String {
        format!(
            "Host {}\n  Hostname 0.0.0.0\n  IdentityFile {}\n  User brev\n  Port {}\n\n",
            alias, KEY, port
        )
    }

    #[test]
    fn empty_file_with_one_active_identifier() {
        let reconciler = Reconciler::new(KEY);
        let out = reconciler
            .sync("", &active(&["alice.example.com"]))
            .expect("sync");
        assert_eq!(
            out,
            "Host alice.example.com\n  Hostname 0.0.0.0\n  IdentityFile /k.pem\n  User brev\n  Port 2222\n\n"
        );
    }

    #[test]
    fn user_only_file_is_untouched_when_nothing_is_active() {
        let reconciler = Reconciler::new(KEY);
        let input = "Host mybox\n  Hostname 1.2.3.4\n";
        let out = reconciler.sync(input, &active(&[])).expect("sync");
        assert_eq!(out, input);
    }

    #[test]
    fn mixed_file_drops_stale_entry_and_reuses_its_port() {
        let reconciler = Reconciler::new(KEY);
        let input = format!(
            "Host mybox\n  Hostname 1.2.3.4\n{}",
            owned_entry("old.example.com", 2222)
        );
        let out = reconciler
            .sync(&input, &active(&["new.example.com"]))
            .expect("sync");
        assert!(out.contains("Host mybox\n  Hostname 1.2.3.4\n"));
        assert!(!out.contains("old.example.com"));
        assert!(out.contains("Host new.example.com\n"));
        assert!(out.contains("  Port 2222\n"));
    }

    #[test]
    fn sync_is_idempotent() {
        let reconciler = Reconciler::new(KEY);
        let ids = active(&["a.example.com", "b.example.com"]);
        let input = format!(
            "# untouched\n\nHost mybox\n  Hostname 1.2.3.4\n{}",
            owned_entry("stale.example.com", 2222)
        );
        let once = reconciler.sync(&input, &ids).expect("first sync");
        let twice = reconciler.sync(&once, &ids).expect("second sync");
        assert_eq!(once, twice);
    }

    #[test]
    fn foreign_blocks_survive_in_order_regardless_of_active_set() {
        let reconciler = Reconciler::new(KEY);
        let input = "Host one\n  Hostname 1.1.1.1\n  ProxyCommand nc %h %p\nHost two\n  Hostname 2.2.2.2\n";
        let out = reconciler
            .sync(input, &active(&["ws.example.com"]))
            .expect("sync");
        let one = out.find("Host one").expect("first foreign block");
        let two = out.find("Host two").expect("second foreign block");
        assert!(one < two);
        assert!(out.contains("  ProxyCommand nc %h %p\n"));
    }

    #[test]
    fn retained_entry_keeps_its_original_port() {
        let reconciler = Reconciler::new(KEY);
        let input = owned_entry("keep.example.com", 2230);
        let out = reconciler
            .sync(&input, &active(&["keep.example.com"]))
            .expect("sync");
        assert_eq!(out, input);
        assert_eq!(
            reconciler
                .configured_port(&out, "keep.example.com")
                .expect("inspect"),
            Some("2230".to_string())
        );
    }

    #[test]
    fn new_entries_never_collide_with_each_other() {
        let reconciler = Reconciler::new(KEY);
        let out = reconciler
            .sync("", &active(&["a.example.com", "b.example.com"]))
            .expect("sync");
        assert!(out.contains("Host a.example.com\n"));
        assert!(out.contains("  Port 2222\n"));
        assert!(out.contains("Host b.example.com\n"));
        assert!(out.contains("  Port 2223\n"));
    }

    #[test]
    fn allocation_fills_the_lowest_gap() {
        let reconciler = Reconciler::new(KEY);
        let contiguous = format!(
            "{}{}",
            owned_entry("a.example.com", 2222),
            owned_entry("b.example.com", 2223)
        );
        let out = reconciler
            .sync(
                &contiguous,
                &active(&["a.example.com", "b.example.com", "c.example.com"]),
            )
            .expect("sync");
        assert!(out.contains("Host c.example.com\n  Hostname 0.0.0.0\n  IdentityFile /k.pem\n  User brev\n  Port 2224\n"));

        let gapped = format!(
            "{}{}",
            owned_entry("a.example.com", 2222),
            owned_entry("b.example.com", 2224)
        );
        let out = reconciler
            .sync(
                &gapped,
                &active(&["a.example.com", "b.example.com", "c.example.com"]),
            )
            .expect("sync");
        assert!(out.contains("Host c.example.com\n  Hostname 0.0.0.0\n  IdentityFile /k.pem\n  User brev\n  Port 2223\n"));
    }

    #[test]
    fn duplicate_active_identifiers_create_one_entry() {
        let reconciler = Reconciler::new(KEY);
        let out = reconciler
            .sync("", &active(&["a.example.com", "a.example.com"]))
            .expect("sync");
        assert_eq!(out.matches("Host a.example.com").count(), 1);
    }

    #[test]
    fn wildcard_block_with_matching_key_is_left_alone() {
        let reconciler = Reconciler::new(KEY);
        let input = format!("Host *\n  IdentityFile {}\n  ForwardAgent yes\n", KEY);
        let out = reconciler.sync(&input, &active(&[])).expect("sync");
        assert_eq!(out, input);
    }

    #[test]
    fn multi_pattern_owned_block_prunes_by_first_pattern() {
        let reconciler = Reconciler::new(KEY);
        let input = format!(
            "Host a.example.com alias-a\n  IdentityFile {}\n  Port 2222\n",
            KEY
        );
        let kept = reconciler
            .sync(&input, &active(&["a.example.com"]))
            .expect("sync");
        assert_eq!(kept, input);
        let dropped = reconciler.sync(&input, &active(&["alias-a"])).expect("sync");
        assert!(!dropped.contains("a.example.com"));
    }

    #[test]
    fn unparsable_input_aborts_with_malformed_config() {
        let reconciler = Reconciler::new(KEY);
        let err = reconciler
            .sync("Host ws\n  Hostname\n", &active(&[]))
            .expect_err("must fail");
        assert_eq!(err.kind, SyncErrorKind::MalformedConfig);
    }

    #[test]
    fn inspection_reports_owned_identifiers_and_ports() {
        let reconciler = Reconciler::new(KEY);
        let input = format!(
            "Host mybox\n  Hostname 1.2.3.4\n{}{}",
            owned_entry("a.example.com", 2222),
            owned_entry("b.example.com", 2223)
        );
        let owned = reconciler.owned_identifiers(&input).expect("owned");
        assert_eq!(owned, vec!["a.example.com", "b.example.com"]);
        let ports: Vec<String> = reconciler.used_ports(&input).expect("ports").into_iter().collect();
        assert_eq!(ports, vec!["2222", "2223"]);
        assert_eq!(
            reconciler.configured_port(&input, "mybox").expect("inspect"),
            None
        );
    }
}
