//! Structured firewall state parsed from `ufw status verbose` output.
//!
//! The convergence logic never greps raw CLI text for markers; it parses the
//! status output once into [`FirewallState`] and every idempotency guard
//! (SSH rule present, active vs inactive) reads the parsed value.

use std::fmt;

use serde::Serialize;

/// Default-policy direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl Direction {
    /// The word `ufw default` expects for this direction.
    #[must_use]
    pub fn as_ufw_arg(self) -> &'static str {
        match self {
            Direction::Incoming => "incoming",
            Direction::Outgoing => "outgoing",
        }
    }
}

/// A default policy value as ufw reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    Allow,
    Deny,
    Reject,
}

impl Policy {
    fn parse(word: &str) -> Option<Self> {
        match word {
            "allow" => Some(Policy::Allow),
            "deny" => Some(Policy::Deny),
            "reject" => Some(Policy::Reject),
            _ => None,
        }
    }

    /// The word `ufw default` expects for this policy.
    #[must_use]
    pub fn as_ufw_arg(self) -> &'static str {
        match self {
            Policy::Allow => "allow",
            Policy::Deny => "deny",
            Policy::Reject => "reject",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ufw_arg())
    }
}

/// One rule row from the status table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirewallRule {
    /// Target column — a service profile (`OpenSSH`) or `port/proto`.
    pub to: String,
    /// Action keyword: `ALLOW`, `DENY`, `REJECT`, or `LIMIT`.
    pub action: String,
    /// Traffic direction: `IN` or `OUT` (ufw omits `IN` in terse output).
    pub direction: String,
    /// Source column, e.g. `Anywhere` or a CIDR.
    pub from: String,
}

impl FirewallRule {
    /// Whether this rule admits inbound SSH traffic — either by the
    /// `OpenSSH` application profile or by an explicit port 22 TCP rule.
    #[must_use]
    pub fn admits_ssh(&self) -> bool {
        if self.action != "ALLOW" || self.direction == "OUT" {
            return false;
        }
        let target = self.to.trim_end_matches("(v6)").trim();
        target == "OpenSSH" || target == "22/tcp" || target == "22"
    }
}

/// Firewall state as reported by `ufw status verbose`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FirewallState {
    /// Whether the firewall is enforcing.
    pub active: bool,
    /// Default policy for inbound traffic, when reported.
    pub default_incoming: Option<Policy>,
    /// Default policy for outbound traffic, when reported.
    pub default_outgoing: Option<Policy>,
    /// Parsed rule rows.
    pub rules: Vec<FirewallRule>,
}

impl FirewallState {
    /// Parse `ufw status verbose` output.
    ///
    /// The parser is deliberately lenient: unrecognized lines are skipped so
    /// that cosmetic changes in ufw output degrade to "state unknown" rather
    /// than an error. An inactive firewall reports no rule table at all.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut state = FirewallState::default();
        let mut in_table = false;

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(status) = trimmed.strip_prefix("Status:") {
                state.active = status.trim() == "active";
                continue;
            }
            if let Some(defaults) = trimmed.strip_prefix("Default:") {
                for part in defaults.split(',') {
                    let part = part.trim();
                    let Some((policy_word, rest)) = part.split_once(' ') else {
                        continue;
                    };
                    let Some(policy) = Policy::parse(policy_word) else {
                        continue;
                    };
                    if rest.contains("incoming") {
                        state.default_incoming = Some(policy);
                    } else if rest.contains("outgoing") {
                        state.default_outgoing = Some(policy);
                    }
                }
                continue;
            }
            // The rule table starts after the "--  ------  ----" separator.
            if trimmed.starts_with("--") {
                in_table = true;
                continue;
            }
            if in_table {
                if let Some(rule) = parse_rule_row(trimmed) {
                    state.rules.push(rule);
                }
            }
        }

        state
    }

    /// Whether an SSH allow rule is already present.
    #[must_use]
    pub fn has_ssh_allow(&self) -> bool {
        self.rules.iter().any(FirewallRule::admits_ssh)
    }
}

/// Parse one rule row, e.g. `OpenSSH  ALLOW IN  Anywhere`.
///
/// Columns are whitespace-aligned and the target may itself contain spaces
/// (`Anywhere (v6)`), so the row is split at the action keyword instead of
/// at fixed column offsets.
fn parse_rule_row(line: &str) -> Option<FirewallRule> {
    const ACTIONS: [&str; 4] = ["ALLOW", "DENY", "REJECT", "LIMIT"];

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let action_idx = tokens
        .iter()
        .position(|t| ACTIONS.contains(t))
        .filter(|&i| i > 0)?;

    let action = tokens[action_idx].to_string();
    let mut from_idx = action_idx + 1;
    let direction = match tokens.get(from_idx) {
        Some(&d @ ("IN" | "OUT" | "FWD")) => {
            from_idx += 1;
            d.to_string()
        }
        _ => "IN".to_string(),
    };

    Some(FirewallRule {
        to: tokens[..action_idx].join(" "),
        action,
        direction,
        from: tokens[from_idx..].join(" "),
    })
}
