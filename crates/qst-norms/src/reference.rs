use std::collections::BTreeMap;
use std::sync::LazyLock;

use qst_core::models::age::AgeBracket;
use qst_core::models::area::BodyArea;
use qst_core::models::modality::Modality;
use qst_core::models::patient::Sex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::NormsError;

use AgeBracket::{From20To30, From30To40, From40To50, From50To60, Over60};
use Modality::{Cdt, Cpt, Hpt, Wdt};
use Sex::{Female, Male};

/// Normative distribution parameters for one (sex, age, modality, area)
/// cell. For log-transformed modalities both values are in log10 units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReferenceEntry {
    pub mean: f64,
    pub standard_deviation: f64,
}

impl ReferenceEntry {
    pub const fn new(mean: f64, standard_deviation: f64) -> Self {
        Self {
            mean,
            standard_deviation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReferenceKey {
    pub sex: Sex,
    pub age_bracket: AgeBracket,
    pub modality: Modality,
    pub body_area: BodyArea,
}

/// Immutable lookup from [`ReferenceKey`] to [`ReferenceEntry`].
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: BTreeMap<ReferenceKey, ReferenceEntry>,
}

impl ReferenceTable {
    /// The compiled-in normative dataset, built on first use.
    pub fn standard() -> &'static ReferenceTable {
        static TABLE: LazyLock<ReferenceTable> = LazyLock::new(|| {
            let mut entries = BTreeMap::new();
            for (sex, age_bracket, modality, [face, hand, feet]) in STANDARD_ROWS {
                for (body_area, (mean, sd)) in BodyArea::ALL.into_iter().zip([face, hand, feet]) {
                    let key = ReferenceKey {
                        sex: *sex,
                        age_bracket: *age_bracket,
                        modality: *modality,
                        body_area,
                    };
                    entries.insert(key, ReferenceEntry::new(*mean, *sd));
                }
            }
            ReferenceTable { entries }
        });
        &TABLE
    }

    /// Build a table from explicit entries. Later duplicates replace
    /// earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = (ReferenceKey, ReferenceEntry)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn lookup(
        &self,
        sex: Sex,
        age_bracket: AgeBracket,
        modality: Modality,
        body_area: BodyArea,
    ) -> Result<ReferenceEntry, NormsError> {
        let key = ReferenceKey {
            sex,
            age_bracket,
            modality,
            body_area,
        };
        self.entries
            .get(&key)
            .copied()
            .ok_or(NormsError::ReferenceNotFound {
                sex,
                age_bracket,
                modality,
                body_area,
            })
    }

    /// All entries for one sex and age bracket, ordered by modality then
    /// body area.
    pub fn bracket(
        &self,
        sex: Sex,
        age_bracket: AgeBracket,
    ) -> impl Iterator<Item = (&ReferenceKey, &ReferenceEntry)> {
        self.entries
            .iter()
            .filter(move |(k, _)| k.sex == sex && k.age_bracket == age_bracket)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

type Row = (Sex, AgeBracket, Modality, [(f64, f64); 3]);

/// (mean, sd) per area in face, hand, feet order.
/// CDT and WDT are in log10 units; CPT and HPT in °C.
#[rustfmt::skip]
const STANDARD_ROWS: &[Row] = &[
    // Female
    (Female, From20To30, Cdt, [(-0.030, 0.199), (0.046, 0.232), (0.278, 0.257)]),
    (Female, From30To40, Cdt, [(-0.035, 0.167), (0.078, 0.209), (0.348, 0.258)]),
    (Female, From40To50, Cdt, [(-0.004, 0.191), (0.145, 0.217), (0.417, 0.256)]),
    (Female, From50To60, Cdt, [(0.022, 0.218), (0.158, 0.229), (0.404, 0.279)]),
    (Female, Over60,     Cdt, [(0.016, 0.240), (0.187, 0.271), (0.377, 0.298)]),

    (Female, From20To30, Wdt, [(0.129, 0.187), (0.187, 0.193), (0.565, 0.175)]),
    (Female, From30To40, Wdt, [(0.118, 0.174), (0.210, 0.206), (0.598, 0.203)]),
    (Female, From40To50, Wdt, [(0.153, 0.213), (0.295, 0.217), (0.650, 0.214)]),
    (Female, From50To60, Wdt, [(0.178, 0.224), (0.346, 0.204), (0.664, 0.215)]),
    (Female, Over60,     Wdt, [(0.176, 0.215), (0.368, 0.211), (0.657, 0.222)]),

    (Female, From20To30, Cpt, [(18.00, 7.74), (15.61, 7.15), (14.11, 8.49)]),
    (Female, From30To40, Cpt, [(15.26, 8.91), (13.88, 8.55), (13.36, 9.08)]),
    (Female, From40To50, Cpt, [(14.92, 9.92), (12.17, 8.71), (12.16, 9.76)]),
    (Female, From50To60, Cpt, [(13.34, 10.41), (10.74, 7.92), (11.45, 9.64)]),
    (Female, Over60,     Cpt, [(6.75, 8.02), (8.58, 8.09), (9.12, 8.42)]),

    (Female, From20To30, Hpt, [(41.61, 4.27), (42.68, 3.24), (43.69, 2.80)]),
    (Female, From30To40, Hpt, [(42.06, 4.22), (42.79, 3.65), (43.96, 3.01)]),
    (Female, From40To50, Hpt, [(42.23, 3.90), (43.49, 3.63), (44.73, 2.78)]),
    (Female, From50To60, Hpt, [(43.04, 3.73), (44.73, 2.72), (45.71, 2.12)]),
    (Female, Over60,     Hpt, [(44.29, 3.26), (45.30, 2.24), (45.99, 1.99)]),

    // Male
    (Male, From20To30, Cdt, [(-0.062, 0.228), (0.035, 0.223), (0.380, 0.249)]),
    (Male, From30To40, Cdt, [(-0.088, 0.214), (0.024, 0.228), (0.406, 0.247)]),
    (Male, From40To50, Cdt, [(0.008, 0.202), (0.090, 0.270), (0.473, 0.319)]),
    (Male, From50To60, Cdt, [(0.015, 0.224), (0.126, 0.261), (0.557, 0.290)]),
    (Male, Over60,     Cdt, [(-0.001, 0.236), (0.209, 0.234), (0.616, 0.266)]),

    (Male, From20To30, Wdt, [(0.104, 0.228), (0.210, 0.206), (0.645, 0.217)]),
    (Male, From30To40, Wdt, [(0.072, 0.206), (0.273, 0.237), (0.733, 0.218)]),
    (Male, From40To50, Wdt, [(0.160, 0.214), (0.294, 0.239), (0.784, 0.211)]),
    (Male, From50To60, Wdt, [(0.168, 0.240), (0.289, 0.198), (0.785, 0.235)]),
    (Male, Over60,     Wdt, [(0.135, 0.254), (0.393, 0.262), (0.803, 0.237)]),

    (Male, From20To30, Cpt, [(13.69, 9.54), (11.24, 8.15), (10.65, 7.90)]),
    (Male, From30To40, Cpt, [(15.18, 10.29), (12.01, 9.23), (11.10, 8.94)]),
    (Male, From40To50, Cpt, [(13.39, 10.69), (10.49, 9.56), (8.77, 8.62)]),
    (Male, From50To60, Cpt, [(8.71, 8.50), (6.51, 6.60), (8.85, 9.01)]),
    (Male, Over60,     Cpt, [(9.89, 8.58), (6.54, 6.98), (11.19, 11.00)]),

    (Male, From20To30, Hpt, [(43.98, 3.50), (44.28, 2.86), (45.12, 2.40)]),
    (Male, From30To40, Hpt, [(43.87, 3.73), (44.99, 2.86), (45.74, 2.56)]),
    (Male, From40To50, Hpt, [(44.27, 3.98), (44.81, 2.88), (46.36, 2.32)]),
    (Male, From50To60, Hpt, [(45.27, 3.56), (45.62, 3.07), (46.89, 1.97)]),
    (Male, Over60,     Hpt, [(45.71, 2.67), (46.95, 2.53), (47.74, 1.55)]),
];
