use serde::{Deserialize, Serialize};
use std::fmt;

use super::Statut;

/// Creation payload for `POST /signalements`.
///
/// Every field is always present except `idEntreprise`, which is left out of
/// the JSON entirely when unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalementRequest {
    pub titre: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub statut: String,
    #[serde(rename = "surfaceM2")]
    pub surface_m2: f64,
    pub budget: f64,
    pub id_utilisateur: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_entreprise: Option<i64>,
}

/// A signalement as returned by the relational API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signalement {
    pub id_signalement: i64,
    #[serde(default)]
    pub titre: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub statut: String,
    #[serde(rename = "surfaceM2", default)]
    pub surface_m2: Option<f64>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub id_utilisateur: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub id_entreprise: Option<i64>,
    #[serde(default)]
    pub nom_entreprise: Option<String>,
    #[serde(default)]
    pub sync_state: Option<String>,
    #[serde(default)]
    pub date_signalement: Option<String>,
    #[serde(default)]
    pub derniere_maj: Option<String>,
}

impl fmt::Display for Signalement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Signalement #{}: {}", self.id_signalement, self.titre)?;
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            writeln!(f, "  {}", description)?;
        }
        writeln!(f, "  Statut:      {}", Statut::label_for(&self.statut))?;
        writeln!(f, "  Position:    {}, {}", self.latitude, self.longitude)?;
        if let Some(surface) = self.surface_m2 {
            writeln!(f, "  Surface:     {} m²", surface)?;
        }
        if let Some(budget) = self.budget {
            writeln!(f, "  Budget:      {}", budget)?;
        }
        if let Some(username) = &self.username {
            writeln!(f, "  Signalé par: {}", username)?;
        }
        if let Some(entreprise) = &self.nom_entreprise {
            writeln!(f, "  Entreprise:  {}", entreprise)?;
        }
        if let Some(date) = &self.date_signalement {
            writeln!(f, "  Date:        {}", date)?;
        }
        Ok(())
    }
}

/// Display projection of a Firestore signalement document.
///
/// Unlike [`SignalementRequest`], missing dates stay missing here so a
/// preview can show "unknown" rather than an invented date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalementView {
    pub id_signalement: i64,
    pub titre: String,
    pub description: String,
    pub category: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_signalement: Option<String>,
    pub statut: String,
    #[serde(rename = "surfaceM2", skip_serializing_if = "Option::is_none")]
    pub surface_m2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub id_utilisateur: i64,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entreprise_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_entreprise: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom_entreprise: Option<String>,
    pub sync_state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derniere_maj: Option<String>,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// Firestore document id
    pub document_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SignalementRequest {
        SignalementRequest {
            titre: "Nid de poule".to_string(),
            description: String::new(),
            latitude: -18.8792,
            longitude: 47.5079,
            statut: "EN_ATTENTE".to_string(),
            surface_m2: 2.5,
            budget: 0.0,
            id_utilisateur: 1,
            id_entreprise: None,
        }
    }

    #[test]
    fn test_request_json_keys() {
        let json = serde_json::to_value(request()).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert!(keys.contains(&"surfaceM2"));
        assert!(keys.contains(&"idUtilisateur"));
        assert!(!keys.contains(&"idEntreprise"));
    }

    #[test]
    fn test_request_includes_entreprise_when_known() {
        let mut req = request();
        req.id_entreprise = Some(7);
        let json = serde_json::to_value(req).unwrap();
        assert_eq!(json["idEntreprise"], 7);
    }

    #[test]
    fn test_signalement_response_tolerates_nulls() {
        let json = r#"{
            "idSignalement": 12,
            "titre": "Fissure",
            "description": null,
            "latitude": -18.9,
            "longitude": 47.52,
            "statut": "EN_COURS",
            "surfaceM2": null,
            "budget": 1500000.0,
            "idUtilisateur": 3,
            "username": "rakoto",
            "idEntreprise": null,
            "dateSignalement": "2024-05-02T09:15:00"
        }"#;
        let s: Signalement = serde_json::from_str(json).unwrap();
        assert_eq!(s.id_signalement, 12);
        assert_eq!(s.budget, Some(1500000.0));
        assert!(s.surface_m2.is_none());

        let text = s.to_string();
        assert!(text.contains("Signalement #12: Fissure"));
        assert!(text.contains("En cours"));
    }
}
