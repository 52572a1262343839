//! Rule tables for risk classification and taxonomy tagging.
//!
//! Tables are plain immutable values: built once at pipeline start (from the
//! built-in defaults or a TOML override) and passed by reference into the
//! classifier and taggers.

use serde::{Deserialize, Serialize};

use crate::error::HorizonError;
use crate::types::{Priority, TimeHorizon};

/// One entry of the ordered risk table. Earlier rules win score ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskRule {
    pub tag: String,
    pub priority: Priority,
    pub time_horizon: TimeHorizon,
    #[serde(default)]
    pub workstreams: Vec<String>,
    pub terms: Vec<String>,
}

impl RiskRule {
    pub fn new(
        tag: &str,
        priority: Priority,
        time_horizon: TimeHorizon,
        workstreams: &[&str],
        terms: &[&str],
    ) -> Self {
        Self {
            tag: tag.to_string(),
            priority,
            time_horizon,
            workstreams: workstreams.iter().map(|w| w.to_string()).collect(),
            terms: terms.iter().map(|t| t.to_lowercase()).collect(),
        }
    }
}

/// Ordered risk rules. Order encodes severity: most severe harm categories first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<RiskRule>,
}

impl RuleTable {
    /// Validate and wrap a rule list. Terms are lowercased so matching against
    /// a lowercase title is case-insensitive.
    pub fn new(rules: Vec<RiskRule>) -> Result<Self, HorizonError> {
        if rules.is_empty() {
            return Err(HorizonError::Config("risk rule table is empty".into()));
        }
        let mut normalized = Vec::with_capacity(rules.len());
        for mut rule in rules {
            if rule.tag.trim().is_empty() {
                return Err(HorizonError::Config("risk rule with empty tag".into()));
            }
            rule.terms = rule
                .terms
                .into_iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect();
            if rule.terms.is_empty() {
                return Err(HorizonError::Config(format!(
                    "risk rule {} has no terms",
                    rule.tag
                )));
            }
            normalized.push(rule);
        }
        Ok(Self { rules: normalized })
    }

    pub fn rules(&self) -> &[RiskRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        use Priority::*;
        use TimeHorizon::*;

        let rules = vec![
            RiskRule::new(
                "CSEA/NCII/VAWG",
                High,
                Now,
                &["PSG"],
                &[
                    "csam",
                    "csea",
                    "child sexual",
                    "ncii",
                    "nudify",
                    "nudification",
                    "undressing",
                    "sexual extortion",
                    "vawg",
                    "non-consensual intimate",
                ],
            ),
            RiskRule::new(
                "FRAUD/FIN",
                High,
                Now,
                &["PSG"],
                &[
                    "scam",
                    "fraud",
                    "money laundering",
                    "aml",
                    "vishing",
                    "voice cloning",
                    "impersonation",
                    "authorised push payment",
                    "bank transfer",
                ],
            ),
            RiskRule::new(
                "CYBER/EXPLOIT",
                High,
                Now,
                &["HSG", "PSG"],
                &[
                    "jailbreak",
                    "prompt injection",
                    "exploit",
                    "malware",
                    "phishing",
                    "credential",
                    "leak",
                    "ransomware",
                    "model extraction",
                ],
            ),
            RiskRule::new(
                "CT/EXTREMISM",
                High,
                ShortTermEmerging,
                &["HSG"],
                &[
                    "terror",
                    "isis",
                    "extrem",
                    "radical",
                    "propaganda",
                    "synthetic media",
                    "deepfake video",
                    "deepfake audio",
                ],
            ),
            RiskRule::new(
                "EVIDENCE/INTEGRITY",
                High,
                ShortTermEmerging,
                &["PSG", "M&B"],
                &[
                    "evidence",
                    "court",
                    "forensic",
                    "chain of custody",
                    "immigration",
                    "border",
                    "asylum",
                    "document fraud",
                    "identity document",
                ],
            ),
            RiskRule::new(
                "AGENTS/CONVERGENCE",
                Medium,
                LongerTermUncertain,
                &["HSG", "PSG", "M&B", "AIHM"],
                &[
                    "agentic",
                    "autonomous agent",
                    "computer use",
                    "tool use",
                    "multi-agent",
                    "drones",
                    "autonomous vehicle",
                    "quantum",
                ],
            ),
            RiskRule::new(
                "CAPABILITY/MILESTONE",
                Medium,
                Now,
                &["AIHM"],
                &[
                    "model card",
                    "system card",
                    "technical report",
                    "safety report",
                    "benchmark",
                    "eval",
                    "evaluation",
                    "red team",
                    "release",
                    "frontier model",
                ],
            ),
        ];

        Self { rules }
    }
}

/// One label of a keyword map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeywordEntry {
    pub label: String,
    pub keywords: Vec<String>,
}

/// Ordered label → keyword list mapping for multi-label tagging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMap {
    entries: Vec<KeywordEntry>,
}

impl KeywordMap {
    pub fn new(entries: Vec<KeywordEntry>) -> Result<Self, HorizonError> {
        let mut normalized = Vec::with_capacity(entries.len());
        for mut entry in entries {
            if entry.label.trim().is_empty() {
                return Err(HorizonError::Config("keyword map entry with empty label".into()));
            }
            entry.keywords = entry
                .keywords
                .into_iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
            normalized.push(entry);
        }
        Ok(Self {
            entries: normalized,
        })
    }

    fn from_static(entries: &[(&str, &[&str])]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(label, keywords)| KeywordEntry {
                    label: label.to_string(),
                    keywords: keywords.iter().map(|k| k.to_string()).collect(),
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[KeywordEntry] {
        &self.entries
    }

    /// NIST AI RMF function hints (Govern/Map/Measure/Manage).
    pub fn rmf_functions() -> Self {
        Self::from_static(&[
            (
                "GOVERN",
                &[
                    "policy",
                    "governance",
                    "accountability",
                    "oversight",
                    "regulator",
                    "compliance",
                    "code of practice",
                    "strategy",
                ],
            ),
            (
                "MAP",
                &[
                    "use case",
                    "context",
                    "impact",
                    "stakeholder",
                    "risk landscape",
                    "threat assessment",
                    "taxonomy",
                ],
            ),
            (
                "MEASURE",
                &[
                    "benchmark",
                    "eval",
                    "evaluation",
                    "testing",
                    "red team",
                    "assurance",
                    "validation",
                    "metrics",
                ],
            ),
            (
                "MANAGE",
                &[
                    "mitigation",
                    "controls",
                    "incident response",
                    "takedown",
                    "enforcement",
                    "safeguard",
                    "monitoring",
                    "removal",
                ],
            ),
        ])
    }

    /// MITRE ATLAS-inspired themes. Hints only, not technique IDs.
    pub fn atlas_themes() -> Self {
        Self::from_static(&[
            (
                "Prompt injection / tool misuse",
                &["prompt injection", "tool use attack", "agent jailbreak"],
            ),
            (
                "Data poisoning / training abuse",
                &["data poisoning", "poisoned dataset", "training data leak"],
            ),
            (
                "Model extraction / theft",
                &["model extraction", "model stealing", "weights leak"],
            ),
            (
                "Evasion / adversarial inputs",
                &["adversarial example", "evasion attack"],
            ),
            (
                "Supply chain / integration risk",
                &["supply chain", "dependency", "plugin", "connector", "rag"],
            ),
        ])
    }
}
