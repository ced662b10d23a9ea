#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

impl MxRecord {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }
}

/// Outcome of the MX lookup for a domain.
///
/// `DomainNotFound` is a failed lookup (NXDOMAIN, network trouble);
/// `NoRecords` is a lookup that succeeded but returned an empty record set.
/// The two classify differently in the final verdict.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MxResolution {
    Records(Vec<MxRecord>),
    NoRecords,
    DomainNotFound,
}

impl MxResolution {
    pub fn found(&self) -> bool {
        matches!(self, Self::Records(_))
    }

    /// Records in resolution order, empty unless the lookup found any.
    pub fn records(&self) -> &[MxRecord] {
        match self {
            Self::Records(records) => records.as_slice(),
            Self::NoRecords | Self::DomainNotFound => &[],
        }
    }

    /// The exchange with the numerically lowest preference. Ties resolve to
    /// the first record seen in resolution order.
    pub fn selected(&self) -> Option<&MxRecord> {
        let mut best: Option<&MxRecord> = None;
        for record in self.records() {
            match best {
                Some(current) if record.preference < current.preference => best = Some(record),
                None => best = Some(record),
                _ => {}
            }
        }
        best
    }
}
