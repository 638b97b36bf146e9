use serde::{Deserialize, Serialize};

/// Public Land Mobile Network identifier of a carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plmn {
    /// Mobile country code.
    pub mcc: String,
    /// Mobile network code.
    pub mnc: String,
}

impl Plmn {
    pub fn new(mcc: impl Into<String>, mnc: impl Into<String>) -> Self {
        Self {
            mcc: mcc.into(),
            mnc: mnc.into(),
        }
    }
}

/// PLMN as sent by a client, either half may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PartialPlmn {
    #[serde(default)]
    pub mcc: Option<String>,
    #[serde(default)]
    pub mnc: Option<String>,
}

impl PartialPlmn {
    /// Returns the pair only when both codes are present and non-empty.
    pub fn complete(self) -> Option<Plmn> {
        match (self.mcc, self.mnc) {
            (Some(mcc), Some(mnc)) if !mcc.is_empty() && !mnc.is_empty() => {
                Some(Plmn { mcc, mnc })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_pair() {
        let plmn: PartialPlmn = serde_json::from_str(r#"{"mcc":"310","mnc":"260"}"#).unwrap();
        assert_eq!(plmn.complete(), Some(Plmn::new("310", "260")));
    }

    #[test]
    fn test_incomplete_pairs() {
        for body in [r#"{"mcc":"310"}"#, r#"{"mnc":"260"}"#, r#"{"mcc":"","mnc":"260"}"#, "{}"] {
            let plmn: PartialPlmn = serde_json::from_str(body).unwrap();
            assert_eq!(plmn.complete(), None, "{body}");
        }
    }
}
