// ============================================================================
// API Client : ECOS (Banque de Corée)
// ============================================================================
// Récupère les taux de change quotidiens depuis l'API StatisticSearch
// de la Banque de Corée (statistique 731Y001 : taux au won des
// principales devises)
//
// CONCEPTS RUST AVANCÉS :
// 1. async/await : programmation asynchrone (non-bloquante)
// 2. JoinSet : fan-out concurrent "best effort" (une tâche par devise)
// 3. Result<T, E> : gestion d'erreurs avec contexte
// 4. Serde : désérialisation JSON automatique
// ============================================================================

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};
use serde::Deserialize;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::models::{find_currency, foreign_currencies, RatePoint, RateTable};

const ECOS_BASE_URL: &str = "https://ecos.bok.or.kr/api/StatisticSearch";

/// Statistique ECOS : taux de change au won des principales devises
const STAT_CODE: &str = "731Y001";

/// Clé API du déploiement de référence, surchargeable par ECOS_API_KEY
const DEFAULT_API_KEY: &str = "EXZHBLWFBSPD12N6J4EP";

/// Fenêtre de recherche pour le dernier taux connu : 7 jours calendaires
/// pour absorber week-ends et jours fériés sans observation
const LATEST_LOOKBACK_DAYS: i64 = 7;

// ============================================================================
// Structures pour parser la réponse JSON d'ECOS
// ============================================================================
// ECOS retourne une enveloppe { "StatisticSearch": { "row": [...] } } où
// chaque ligne porte le code item, la date (YYYYMMDD) et la valeur sous
// forme de string (avec séparateurs de milliers éventuels)
//
// CONCEPT RUST : #[serde(rename = "...")]
// - Permet de mapper un nom de champ JSON différent du nom Rust
// - Exemple : "DATA_VALUE" (JSON) -> "data_value" (Rust)
// ============================================================================

/// Réponse complète de l'API ECOS
///
/// Tout est optionnel : en cas d'erreur côté provider, l'enveloppe ne
/// contient qu'un bloc RESULT (code + message) qu'on ignore ici — une
/// réponse sans lignes est traitée comme une série vide.
#[derive(Debug, Deserialize)]
struct EcosResponse {
    #[serde(rename = "StatisticSearch")]
    statistic_search: Option<StatisticSearch>,
}

#[derive(Debug, Deserialize)]
struct StatisticSearch {
    #[serde(default)]
    #[allow(dead_code)]
    list_total_count: Option<u64>,

    row: Option<Vec<EcosRow>>,
}

/// Une ligne d'observation de la statistique
#[derive(Debug, Clone, Deserialize)]
struct EcosRow {
    #[serde(rename = "ITEM_CODE1", default)]
    #[allow(dead_code)]
    item_code: String,

    #[serde(rename = "ITEM_NAME1", default)]
    #[allow(dead_code)]
    item_name: String,

    /// Date de l'observation, token YYYYMMDD
    #[serde(rename = "TIME")]
    time: String,

    /// Valeur numérique formatée en string (ex: "1,350.5")
    #[serde(rename = "DATA_VALUE")]
    data_value: String,

    #[serde(rename = "UNIT_NAME", default)]
    #[allow(dead_code)]
    unit_name: String,
}

// ============================================================================
// Helpers purs (testables sans réseau)
// ============================================================================

/// Retourne la clé API (variable d'environnement ou clé par défaut)
fn api_key() -> String {
    std::env::var("ECOS_API_KEY").unwrap_or_else(|_| DEFAULT_API_KEY.to_string())
}

/// Formate une date au format attendu par ECOS (YYYYMMDD)
fn format_ecos_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Parse une valeur numérique ECOS
///
/// Les valeurs peuvent contenir des séparateurs de milliers ("1,350.5")
/// qu'il faut retirer avant la conversion en float.
fn parse_data_value(raw: &str) -> Option<f64> {
    raw.replace(',', "").trim().parse::<f64>().ok()
}

/// Ramène une valeur cotée par paquet à une cotation "par 1 unité"
///
/// Exemple : le JPY est coté pour 100 yens, une valeur brute de 950.0
/// avec unit = 100 donne 9.5 KRW par yen.
fn unit_adjust(value: f64, unit: u32) -> f64 {
    value / unit as f64
}

/// Construit l'URL de l'API StatisticSearch
///
/// Les paramètres sont encodés dans le chemin :
/// clé / format / langue / pagination / statistique / fréquence (D) /
/// date début / date fin / code item de la devise
fn build_stat_url(key: &str, max_rows: u32, item_code: &str, start: &str, end: &str) -> String {
    format!(
        "{}/{}/json/kr/1/{}/{}/D/{}/{}/{}",
        ECOS_BASE_URL, key, max_rows, STAT_CODE, start, end, item_code
    )
}

/// Sélectionne la ligne la plus récente par date
fn latest_row(rows: &[EcosRow]) -> Option<&EcosRow> {
    rows.iter().max_by(|a, b| a.time.cmp(&b.time))
}

/// Garde les `window` derniers éléments d'une série chronologique
///
/// CONCEPT RUST : split_off
/// - Coupe le Vec en place, sans copier les éléments gardés
/// - Si la série est plus courte que la fenêtre, tout est gardé
fn tail_window<T>(mut items: Vec<T>, window: usize) -> Vec<T> {
    if items.len() > window {
        items.split_off(items.len() - window)
    } else {
        items
    }
}

/// Convertit un token YYYYMMDD en date d'affichage "mois/jour"
///
/// Pas de zéro initial : "20240105" donne "1/5". Retourne None si le
/// token n'a pas 8 chiffres.
fn display_date(time: &str) -> Option<String> {
    if time.len() != 8 || !time.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let month: u32 = time[4..6].parse().ok()?;
    let day: u32 = time[6..8].parse().ok()?;
    Some(format!("{}/{}", month, day))
}

// ============================================================================
// Fonctions publiques de l'API
// ============================================================================

/// Construit le client HTTP partagé
fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
        .build()
        .context("Échec de la création du client HTTP")
}

/// Exécute une requête ECOS et retourne les lignes (vide si absentes)
async fn fetch_rows(client: &reqwest::Client, url: &str) -> Result<Vec<EcosRow>> {
    debug!(url = %url, "Sending HTTP request to ECOS");

    let response = client
        .get(url)
        .send()
        .await
        .context("Échec de la requête HTTP vers ECOS")?;

    let status = response.status();
    debug!(status = %status, "Received HTTP response");

    if !status.is_success() {
        anyhow::bail!("ECOS a retourné une erreur : HTTP {}", status);
    }

    let ecos_response: EcosResponse = response
        .json()
        .await
        .context("Échec du parsing JSON de la réponse ECOS")?;

    // Enveloppe sans lignes (RESULT seul, erreur provider) : série vide
    Ok(ecos_response
        .statistic_search
        .and_then(|s| s.row)
        .unwrap_or_default())
}

/// Récupère le dernier taux connu de chaque devise étrangère
///
/// Une requête indépendante par devise, toutes concurrentes. L'échec
/// d'une devise est isolé : elle est simplement absente de la table et
/// listée dans `failed`. Si TOUTES échouent, la table retournée est
/// vide — la couche de présentation traite ce cas comme une erreur
/// utilisateur avec invitation à réessayer.
///
/// CONCEPT RUST : JoinSet
/// - spawn() lance chaque fetch comme une tâche tokio indépendante
/// - join_next() attend que chacune se termine (succès OU échec)
/// - Équivalent d'un Promise.allSettled : on agrège après règlement
///   complet, une devise lente ne bloque que sa propre entrée
#[instrument]
pub async fn fetch_latest_rates() -> Result<RateTable> {
    let client = build_client()?;
    let key = api_key();

    let today = Local::now().date_naive();
    let start = format_ecos_date(today - Duration::days(LATEST_LOOKBACK_DAYS));
    let end = format_ecos_date(today);

    let mut set = JoinSet::new();

    for currency in foreign_currencies() {
        let client = client.clone();
        let url = build_stat_url(&key, 10, currency.ecos_item_code, &start, &end);
        let code = currency.code;
        let unit = currency.unit;

        set.spawn(async move {
            let outcome = fetch_rows(&client, &url).await.map(|rows| {
                latest_row(&rows).and_then(|row| {
                    let value = parse_data_value(&row.data_value)?;
                    Some((row.time.clone(), unit_adjust(value, unit)))
                })
            });
            (code, outcome)
        });
    }

    let mut table = RateTable::new();

    // Attend que CHAQUE tâche se règle avant d'agréger
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((code, Ok(Some((time, rate))))) => {
                debug!(currency = %code, rate, date = %time, "Latest rate fetched");
                table.rates.insert(code.to_string(), rate);
                if time > table.reference_date {
                    table.reference_date = time;
                }
            }
            Ok((code, Ok(None))) => {
                // Réponse valide mais sans observation exploitable
                warn!(currency = %code, "No usable observation in ECOS response");
                table.failed.push(code.to_string());
            }
            Ok((code, Err(e))) => {
                warn!(currency = %code, error = ?e, "Failed to fetch latest rate");
                table.failed.push(code.to_string());
            }
            Err(e) => {
                // Tâche panic/annulée : on ne sait plus quelle devise,
                // mais l'agrégat reste utilisable
                warn!(error = ?e, "Rate fetch task failed to join");
            }
        }
    }

    info!(
        loaded = table.len(),
        failed = table.failed.len(),
        date = %table.reference_date,
        "Latest rates aggregated"
    );

    Ok(table)
}

/// Récupère la série historique d'une devise (KRW par unité)
///
/// Retourne immédiatement une série vide pour le KRW ou un code inconnu
/// (aucune requête émise). La fenêtre demandée est élargie à
/// ceil(days * 1.5) jours calendaires pour absorber les jours sans
/// cotation, puis la série est tronquée aux `days` dernières
/// observations (ordre chronologique préservé).
///
/// Toute erreur de transport ou de parsing produit une série vide :
/// l'appelant dégrade gracieusement (le graphique est simplement omis).
#[instrument]
pub async fn fetch_historical_rates(code: &str, days: u32) -> Vec<RatePoint> {
    let currency = match find_currency(code) {
        Some(c) if !c.is_base() => c,
        _ => return Vec::new(),
    };

    let lookback = (days as f64 * 1.5).ceil() as i64;
    let today = Local::now().date_naive();
    let start = format_ecos_date(today - Duration::days(lookback));
    let end = format_ecos_date(today);

    let result: Result<Vec<RatePoint>> = async {
        let client = build_client()?;
        let url = build_stat_url(&api_key(), 100, currency.ecos_item_code, &start, &end);
        let rows = fetch_rows(&client, &url).await?;

        let points = tail_window(rows, days as usize)
            .into_iter()
            .filter_map(|row| {
                let date = display_date(&row.time)?;
                let value = parse_data_value(&row.data_value)?;
                Some(RatePoint::new(date, unit_adjust(value, currency.unit)))
            })
            .collect();

        Ok(points)
    }
    .await;

    match result {
        Ok(points) => {
            info!(currency = %code, points = points.len(), "Historical series fetched");
            points
        }
        Err(e) => {
            warn!(currency = %code, error = ?e, "Failed to fetch historical series");
            Vec::new()
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row(time: &str, value: &str) -> EcosRow {
        EcosRow {
            item_code: "0000001".to_string(),
            item_name: "원/미국달러".to_string(),
            time: time.to_string(),
            data_value: value.to_string(),
            unit_name: "원".to_string(),
        }
    }

    #[test]
    fn test_parse_data_value_strips_thousands_separators() {
        assert_eq!(parse_data_value("1,350.5"), Some(1350.5));
        assert_eq!(parse_data_value("950"), Some(950.0));
        assert_eq!(parse_data_value("1,234,567.89"), Some(1234567.89));
        assert_eq!(parse_data_value("n/a"), None);
        assert_eq!(parse_data_value(""), None);
    }

    #[test]
    fn test_unit_adjust() {
        // JPY coté pour 100 yens : 10000 brut -> 100 par yen
        assert_eq!(unit_adjust(10000.0, 100), 100.0);
        assert_eq!(unit_adjust(1350.0, 1), 1350.0);
    }

    #[test]
    fn test_build_stat_url() {
        let url = build_stat_url("MYKEY", 10, "0000001", "20240108", "20240115");
        assert!(url.starts_with(ECOS_BASE_URL));
        assert!(url.contains("/MYKEY/json/kr/1/10/731Y001/D/20240108/20240115/0000001"));
    }

    #[test]
    fn test_latest_row_picks_most_recent_date() {
        let rows = vec![row("20240112", "1340"), row("20240115", "1350"), row("20240114", "1345")];
        assert_eq!(latest_row(&rows).unwrap().time, "20240115");

        assert!(latest_row(&[]).is_none());
    }

    #[test]
    fn test_tail_window_keeps_last_n_in_order() {
        let items: Vec<u32> = (1..=10).collect();
        assert_eq!(tail_window(items, 3), vec![8, 9, 10]);
    }

    #[test]
    fn test_tail_window_shorter_than_window() {
        let items = vec![1, 2];
        assert_eq!(tail_window(items, 7), vec![1, 2]);
    }

    #[test]
    fn test_display_date_no_zero_padding() {
        assert_eq!(display_date("20240105").as_deref(), Some("1/5"));
        assert_eq!(display_date("20241231").as_deref(), Some("12/31"));
        assert_eq!(display_date("2024"), None);
        assert_eq!(display_date("abcdefgh"), None);
    }

    #[test]
    fn test_deserialize_ecos_envelope() {
        let json = r#"{
            "StatisticSearch": {
                "list_total_count": 2,
                "row": [
                    {"ITEM_CODE1": "0000001", "ITEM_NAME1": "원/미국달러",
                     "TIME": "20240114", "DATA_VALUE": "1,342.1", "UNIT_NAME": "원"},
                    {"ITEM_CODE1": "0000001", "ITEM_NAME1": "원/미국달러",
                     "TIME": "20240115", "DATA_VALUE": "1,350.5", "UNIT_NAME": "원"}
                ]
            }
        }"#;

        let parsed: EcosResponse = serde_json::from_str(json).unwrap();
        let rows = parsed.statistic_search.unwrap().row.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].time, "20240115");
        assert_eq!(parse_data_value(&rows[1].data_value), Some(1350.5));
    }

    #[test]
    fn test_deserialize_error_envelope_yields_no_rows() {
        // Enveloppe d'erreur provider : bloc RESULT seul, pas de lignes
        let json = r#"{"RESULT": {"CODE": "INFO-200", "MESSAGE": "해당하는 데이터가 없습니다."}}"#;

        let parsed: EcosResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.statistic_search.is_none());
    }

    // Test async nécessite tokio test runtime
    // CONCEPT RUST : #[tokio::test]
    // - Macro qui setup un runtime tokio pour le test
    // - Permet d'utiliser .await dans les tests
    #[tokio::test]
    async fn test_fetch_historical_rates_base_currency_is_empty() {
        // Le KRW est la référence : pas de requête réseau, série vide
        assert!(fetch_historical_rates("KRW", 7).await.is_empty());
        assert!(fetch_historical_rates("XYZ", 7).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_latest_rates_live() {
        // Test avec un vrai appel API (peut échouer si pas de connexion)
        match fetch_latest_rates().await {
            Ok(table) if !table.is_empty() => {
                assert_eq!(table.reference_date.len(), 8);
                println!("✓ Récupéré {} taux (au {})", table.len(), table.reference_date);
            }
            Ok(_) => println!("⚠ Table vide (pas de connexion?)"),
            Err(e) => println!("⚠ Test skippé (pas de connexion?) : {}", e),
        }
    }
}
