use serde::{Deserialize, Serialize};

use super::lexicon::strings;

/// One row of the operator account table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OperatorEntry {
    pub id: i64,
    pub name: String,
}

/// Account name matched exactly, bypassing the substring ladder.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExactName {
    pub name: String,
    pub branch: String,
}

/// `marker` found anywhere in the canonical name ⇒ `branch`. First match wins.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BranchRule {
    pub marker: String,
    pub branch: String,
}

/// Operator table, branch ladder and antenna rules.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub unknown_operator: String,
    pub other_branch: String,
    pub exact_names: Vec<ExactName>,
    pub branch_rules: Vec<BranchRule>,
    pub antenna: AntennaRules,
    pub operators: Vec<OperatorEntry>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            unknown_operator: "Unknown".to_string(),
            other_branch: "Other".to_string(),
            exact_names: vec![
                ExactName {
                    name: "admin".to_string(),
                    branch: "Admin".to_string(),
                },
                ExactName {
                    name: "doubleecoute".to_string(),
                    branch: "Paris".to_string(),
                },
            ],
            branch_rules: BRANCH_LADDER
                .iter()
                .map(|(marker, branch)| BranchRule {
                    marker: marker.to_string(),
                    branch: branch.to_string(),
                })
                .collect(),
            antenna: AntennaRules::default(),
            operators: OPERATORS
                .iter()
                .map(|(id, name)| OperatorEntry {
                    id: *id,
                    name: name.to_string(),
                })
                .collect(),
        }
    }
}

/// How an antenna is read from a routing message and normalized.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AntennaRules {
    /// Returned when nothing can be resolved.
    pub unknown: String,
    /// Department labels of the national waiting pools; any other label
    /// already names a branch.
    pub national_departments: Vec<String>,
    /// Tried in order; the antenna starts right after the first one found.
    pub lead_ins: Vec<String>,
    /// Loose fallback: this keyword, whitespace, then everything up to a quote.
    pub loose_keyword: String,
    pub anglophone_marker: String,
    pub anglophone_label: String,
    /// Matched case-insensitively.
    pub regional_marker: String,
    pub regional_label: String,
    /// Stripped from the front of a raw antenna name.
    pub prefix: String,
}

impl Default for AntennaRules {
    fn default() -> Self {
        Self {
            unknown: "Unknown".to_string(),
            national_departments: strings(&[
                "Appels en attente (national)",
                "English calls (national)",
            ]),
            lead_ins: strings(&[
                "as no operators online in \"Nightline ",
                "from \"Nightline ",
                "de \"Nightline ",
                "en \"Nightline ",
            ]),
            loose_keyword: "Nightline".to_string(),
            anglophone_marker: "Anglophone".to_string(),
            anglophone_label: "Paris - Anglophone".to_string(),
            regional_marker: "Angers".to_string(),
            regional_label: "Pays de la Loire".to_string(),
            prefix: "Nightline ".to_string(),
        }
    }
}

const BRANCH_LADDER: &[(&str, &str)] = &[
    ("NightlineAnglophone", "Paris_Ang"),
    ("NightlineParis", "Paris"),
    ("NightlineLyon", "Lyon"),
    ("NightlineSaclay", "Saclay"),
    ("NightlineToulouse", "Toulouse"),
    ("NightlineAngers", "Angers"),
    ("NightlineNantes", "Nantes"),
    ("NightlineRouen", "Rouen"),
    ("NightlineReims", "Reims"),
    ("NightlineLille", "Lille"),
    ("NightlineFormateur", "Formateur"),
];

const OPERATORS: &[(i64, &str)] = &[
    (1, "admin"),
    (2, "NightlineParis1"),
    (3, "NightlineParis2"),
    (4, "NightlineParis3"),
    (5, "NightlineParis4"),
    (6, "NightlineParis5"),
    (7, "NightlineLyon1"),
    (9, "NightlineParis6"),
    (12, "NightlineAnglophone1"),
    (13, "NightlineAnglophone2"),
    (14, "NightlineAnglophone3"),
    (16, "NightlineSaclay1"),
    (18, "NightlineSaclay3"),
    (19, "NightlineParis7"),
    (20, "NightlineParis8"),
    (21, "NightlineLyon2"),
    (22, "NightlineLyon3"),
    (26, "NightlineSaclay2"),
    (30, "NightlineSaclay4"),
    (31, "NightlineSaclay5"),
    (32, "NightlineSaclay6"),
    (33, "NightlineLyon4"),
    (34, "NightlineLyon5"),
    (35, "NightlineLyon6"),
    (36, "NightlineLyon7"),
    (37, "NightlineLyon8"),
    (38, "NightlineSaclay7"),
    (40, "NightlineParis9"),
    (42, "NightlineFormateur1"),
    (43, "NightlineAnglophone4"),
    (44, "NightlineAnglophone5"),
    (45, "NightlineParis10"),
    (46, "NightlineParis11"),
    (47, "NightlineToulouse1"),
    (48, "NightlineToulouse2"),
    (49, "NightlineToulouse3"),
    (50, "NightlineToulouse4"),
    (51, "NightlineToulouse5"),
    (52, "NightlineToulouse6"),
    (53, "NightlineToulouse7"),
    (54, "NightlineAngers1"),
    (55, "NightlineAngers2"),
    (56, "NightlineAngers3"),
    (57, "NightlineAngers4"),
    (58, "doubleecoute"),
    (59, "NightlineNantes1"),
    (60, "NightlineNantes2"),
    (61, "NightlineNantes3"),
    (62, "NightlineNantes4"),
    (63, "NightlineRouen1"),
    (64, "NightlineRouen2"),
    (65, "NightlineRouen3"),
    (67, "NightlineRouen4"),
    (68, "NightlineNantes5"),
    (69, "NightlineNantes6"),
    (70, "NightlineAngers5"),
    (71, "NightlineAngers6"),
    (72, "NightlineRouen5"),
    (73, "NightlineRouen6"),
    (74, "NightlineAngers7"),
    (75, "NightlineLyon9"),
    (76, "NightlineReims"),
    (77, "NightlineToulouse8"),
    (78, "NightlineToulouse9"),
    (79, "NightlineReims1"),
    (80, "NightlineReims2"),
    (81, "NightlineReims3"),
    (82, "NightlineReims4"),
    (83, "NightlineReims5"),
    (84, "NightlineLille1"),
    (85, "NightlineLille2"),
    (86, "NightlineLille3"),
    (87, "NightlineLille4"),
    (88, "NightlineRouen7"),
    (89, "NightlineRouen8"),
    (90, "NightlineRouen9"),
    (91, "NightlineRouen10"),
    (92, "NightlineRouen11"),
    (93, "NightlineRouen12"),
];
