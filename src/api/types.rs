use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Blank CSV cells are stored as `null`; read them as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A public official as returned by the API.
///
/// Wire names follow the dataset's CSV headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Politician {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "nombre", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "partido", default, deserialize_with = "null_as_default")]
    pub party: String,
    #[serde(rename = "partido_para_filtro", default, deserialize_with = "null_as_default")]
    pub party_filter: String,
    #[serde(rename = "genero", default, deserialize_with = "null_as_default")]
    pub gender: String,
    #[serde(rename = "cargo", default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(rename = "cargo_para_filtro", default, deserialize_with = "null_as_default")]
    pub role_filter: String,
    #[serde(rename = "institucion", default, deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(rename = "ccaa", default, deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(rename = "sueldobase_sueldo", default, deserialize_with = "null_as_default")]
    pub base_salary: f64,
    #[serde(rename = "complementos_sueldo", default, deserialize_with = "null_as_default")]
    pub supplements: f64,
    #[serde(rename = "pagasextra_sueldo", default, deserialize_with = "null_as_default")]
    pub bonuses: f64,
    #[serde(
        rename = "otrasdietaseindemnizaciones_sueldo",
        default,
        deserialize_with = "null_as_default"
    )]
    pub allowances: f64,
    #[serde(rename = "trienios_sueldo", default, deserialize_with = "null_as_default")]
    pub seniority_pay: f64,
    #[serde(rename = "retribucionmensual", default, deserialize_with = "null_as_default")]
    pub monthly_pay: f64,
    #[serde(rename = "retribucionanual", default, deserialize_with = "null_as_default")]
    pub annual_pay: f64,
    #[serde(rename = "observaciones", default)]
    pub remarks: Option<String>,
}

/// Partial update sent with `PATCH /politicians/{id}`.
///
/// Unset fields are omitted from the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoliticianUpdate {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "partido", skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    #[serde(rename = "genero", skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(rename = "cargo", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "institucion", skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(rename = "ccaa", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(rename = "sueldobase_sueldo", skip_serializing_if = "Option::is_none")]
    pub base_salary: Option<f64>,
    #[serde(rename = "complementos_sueldo", skip_serializing_if = "Option::is_none")]
    pub supplements: Option<f64>,
    #[serde(rename = "pagasextra_sueldo", skip_serializing_if = "Option::is_none")]
    pub bonuses: Option<f64>,
    #[serde(
        rename = "otrasdietaseindemnizaciones_sueldo",
        skip_serializing_if = "Option::is_none"
    )]
    pub allowances: Option<f64>,
    #[serde(rename = "trienios_sueldo", skip_serializing_if = "Option::is_none")]
    pub seniority_pay: Option<f64>,
    #[serde(rename = "retribucionmensual", skip_serializing_if = "Option::is_none")]
    pub monthly_pay: Option<f64>,
    #[serde(rename = "retribucionanual", skip_serializing_if = "Option::is_none")]
    pub annual_pay: Option<f64>,
    #[serde(rename = "observaciones", skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl PoliticianUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Gender values present in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    Hombre,
    Mujer,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Hombre, Gender::Mujer];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Hombre => "Hombre",
            Gender::Mujer => "Mujer",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Hombre" => Ok(Gender::Hombre),
            "Mujer" => Ok(Gender::Mujer),
            other => Err(format!("unknown gender '{}'", other)),
        }
    }
}

/// Query parameters accepted by `GET /politicians`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub name: Option<String>,
    pub party: Option<String>,
    pub gender: Option<Gender>,
}

impl ListParams {
    /// Pairs in the API's own naming (`per_page`, not `perPage`).
    /// Unset and empty values are left out.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page", per_page.to_string()));
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            pairs.push(("name", name.to_string()));
        }
        if let Some(party) = self.party.as_deref().filter(|p| !p.is_empty()) {
            pairs.push(("party", party.to_string()));
        }
        if let Some(gender) = self.gender {
            pairs.push(("gender", gender.as_str().to_string()));
        }
        pairs
    }
}

/// Raw body of `GET /politicians`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoliticiansResponse {
    pub data: Vec<Politician>,
    #[serde(default)]
    pub total_pages: u32,
}

/// One page of results, replaced wholesale on every query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub records: Vec<Politician>,
    pub total_pages: u32,
}

impl PageResult {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<PoliticiansResponse> for PageResult {
    fn from(resp: PoliticiansResponse) -> Self {
        Self {
            records: resp.data,
            total_pages: resp.total_pages,
        }
    }
}

/// An entry of the top salaries ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopSalary {
    #[serde(rename = "nombre", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "cargo", default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(rename = "retribucionanual", default, deserialize_with = "null_as_default")]
    pub annual_pay: f64,
}

/// Aggregate salary statistics computed server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(default, deserialize_with = "null_as_default")]
    pub mean_salary: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub median_salary: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_salaries: Vec<TopSalary>,
}

impl Statistics {
    pub const TOP_LIMIT: usize = 10;

    /// Clamp the ranking to its fixed length.
    pub fn normalized(mut self) -> Self {
        self.top_salaries.truncate(Self::TOP_LIMIT);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.top_salaries.is_empty() && self.mean_salary == 0.0 && self.median_salary == 0.0
    }
}

/// `{ "message": ... }` acknowledgement returned by mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "_id": "abc123",
            "nombre": "John Doe",
            "partido": "Partido X",
            "partido_para_filtro": "PX",
            "genero": "Hombre",
            "cargo": "Diputado",
            "cargo_para_filtro": "Diputado",
            "institucion": "Congreso",
            "ccaa": "Madrid",
            "sueldobase_sueldo": 1000.5,
            "complementos_sueldo": 200.0,
            "pagasextra_sueldo": 0.0,
            "otrasdietaseindemnizaciones_sueldo": 0.0,
            "trienios_sueldo": 0.0,
            "retribucionmensual": 3500.0,
            "retribucionanual": 42000.0,
            "observaciones": null
        })
    }

    #[test]
    fn test_politician_deserializes_wire_names() {
        let p: Politician = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(p.id, "abc123");
        assert_eq!(p.name, "John Doe");
        assert_eq!(p.region, "Madrid");
        assert_eq!(p.annual_pay, 42000.0);
        assert!(p.remarks.is_none());
    }

    #[test]
    fn test_politician_tolerates_missing_optional_fields() {
        let p: Politician =
            serde_json::from_value(serde_json::json!({"_id": "1", "nombre": "Jane Doe"})).unwrap();
        assert_eq!(p.name, "Jane Doe");
        assert_eq!(p.party, "");
        assert_eq!(p.monthly_pay, 0.0);
    }

    #[test]
    fn test_politician_reads_null_cells_as_blank() {
        let p: Politician = serde_json::from_value(serde_json::json!({
            "_id": "1",
            "nombre": "Jane Doe",
            "partido": null,
            "ccaa": null,
            "trienios_sueldo": null,
            "retribucionanual": null,
            "observaciones": null
        }))
        .unwrap();
        assert_eq!(p.party, "");
        assert_eq!(p.region, "");
        assert_eq!(p.seniority_pay, 0.0);
        assert_eq!(p.annual_pay, 0.0);
        assert!(p.remarks.is_none());
    }

    #[test]
    fn test_statistics_tolerate_null_aggregates() {
        let stats: Statistics = serde_json::from_value(serde_json::json!({
            "mean_salary": null,
            "median_salary": null,
            "top_salaries": [{"nombre": "A", "cargo": null, "retribucionanual": 1.0}]
        }))
        .unwrap();
        assert_eq!(stats.mean_salary, 0.0);
        assert_eq!(stats.top_salaries[0].role, "");
    }

    #[test]
    fn test_update_serializes_only_set_fields() {
        let update = PoliticianUpdate {
            party: Some("Nuevo".to_string()),
            annual_pay: Some(50000.0),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["partido"], "Nuevo");
        assert_eq!(obj["retribucionanual"], 50000.0);
    }

    #[test]
    fn test_update_is_empty() {
        assert!(PoliticianUpdate::default().is_empty());
        let update = PoliticianUpdate {
            remarks: Some(String::new()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_gender_parse_is_exact() {
        assert_eq!("Mujer".parse::<Gender>(), Ok(Gender::Mujer));
        assert_eq!("Hombre".parse::<Gender>(), Ok(Gender::Hombre));
        assert!("mujer".parse::<Gender>().is_err());
        assert!("".parse::<Gender>().is_err());
    }

    #[test]
    fn test_list_params_pairs_use_api_names() {
        let params = ListParams {
            page: Some(2),
            per_page: Some(25),
            name: Some("Jane".to_string()),
            party: None,
            gender: Some(Gender::Mujer),
        };
        let pairs = params.to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page", "2".to_string()),
                ("per_page", "25".to_string()),
                ("name", "Jane".to_string()),
                ("gender", "Mujer".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_params_skip_empty_strings() {
        let params = ListParams {
            name: Some(String::new()),
            party: Some(String::new()),
            ..Default::default()
        };
        assert!(params.to_pairs().is_empty());
    }

    #[test]
    fn test_page_result_from_response() {
        let resp: PoliticiansResponse = serde_json::from_value(serde_json::json!({
            "data": [sample_json()],
            "total_pages": 7
        }))
        .unwrap();
        let page = PageResult::from(resp);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.total_pages, 7);
        assert!(!page.is_empty());
    }

    #[test]
    fn test_statistics_accepts_partial_top_entries() {
        let stats: Statistics = serde_json::from_value(serde_json::json!({
            "mean_salary": 50000,
            "median_salary": 45000,
            "top_salaries": [
                {"nombre": "Politician 1", "cargo": "Position 1", "retribucionanual": 60000},
                {"nombre": "Politician 2", "cargo": "Position 2", "retribucionanual": 55000}
            ]
        }))
        .unwrap();
        assert_eq!(stats.mean_salary, 50000.0);
        assert_eq!(stats.top_salaries.len(), 2);
        assert_eq!(stats.top_salaries[1].annual_pay, 55000.0);
    }

    #[test]
    fn test_statistics_normalized_truncates_ranking() {
        let entry = TopSalary {
            name: "x".to_string(),
            role: "y".to_string(),
            annual_pay: 1.0,
        };
        let stats = Statistics {
            mean_salary: 1.0,
            median_salary: 1.0,
            top_salaries: vec![entry; 14],
        }
        .normalized();
        assert_eq!(stats.top_salaries.len(), Statistics::TOP_LIMIT);
    }
}
