use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Known signalement status codes.
///
/// The backend accepts any string, so these are labels for display and
/// defaults rather than a closed set: unknown codes are carried as plain
/// strings elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Statut {
    #[default]
    EnAttente,
    EnCours,
    Resolu,
}

impl Statut {
    pub fn code(&self) -> &'static str {
        match self {
            Statut::EnAttente => "EN_ATTENTE",
            Statut::EnCours => "EN_COURS",
            Statut::Resolu => "RESOLU",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Statut::EnAttente => "En attente",
            Statut::EnCours => "En cours",
            Statut::Resolu => "Résolu",
        }
    }

    /// Display label for any code, falling back to the code itself.
    pub fn label_for(code: &str) -> &str {
        match Statut::from_str(code) {
            Ok(statut) => statut.label(),
            Err(_) => code,
        }
    }
}

impl fmt::Display for Statut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Statut {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EN_ATTENTE" => Ok(Statut::EnAttente),
            "EN_COURS" => Ok(Statut::EnCours),
            "RESOLU" => Ok(Statut::Resolu),
            _ => Err(format!(
                "Unknown statut '{}'. Known codes: EN_ATTENTE, EN_COURS, RESOLU",
                s
            )),
        }
    }
}
