// ============================================================================
// Helpers de formatage monétaire
// ============================================================================
// Rendu des montants et des dates de référence pour l'affichage
//
// CONCEPTS RUST :
// 1. String building : format! et manipulation de chars
// 2. Slicing de strings ASCII (tokens YYYYMMDD)
// ============================================================================

/// Formate un montant selon les conventions de la devise
///
/// Groupement des milliers par virgules ; 0 décimale pour le KRW et le
/// JPY (pas de subdivision affichée), au plus 2 décimales sinon (les
/// zéros de fin sont retirés).
pub fn format_currency(value: f64, code: &str) -> String {
    let decimals = if code == "KRW" || code == "JPY" { 0 } else { 2 };
    format_grouped(value, decimals)
}

/// Formate le taux unitaire affiché sous le résultat
///
/// "1 USD = 1350.00 KRW" : 2 décimales quand la cible est KRW/JPY
/// (taux grands), 4 sinon (taux proches de 1 où la précision compte).
pub fn format_unit_rate(rate: f64, to_code: &str) -> String {
    let decimals = if to_code == "KRW" || to_code == "JPY" { 2 } else { 4 };
    format!("{:.*}", decimals, rate)
}

/// Convertit un token YYYYMMDD en libellé "Au YYYY.M.D"
///
/// Mois et jour sans zéro initial. String vide si le token est malformé.
pub fn format_display_date(token: &str) -> String {
    if token.len() != 8 || !token.chars().all(|c| c.is_ascii_digit()) {
        return String::new();
    }

    let year = &token[0..4];
    // unwrap_or(0) impossible à atteindre : tout est chiffre ASCII ici
    let month: u32 = token[4..6].parse().unwrap_or(0);
    let day: u32 = token[6..8].parse().unwrap_or(0);

    format!("Au {}.{}.{}", year, month, day)
}

/// Arrondit, groupe les milliers et retire les zéros de fin
fn format_grouped(value: f64, max_decimals: usize) -> String {
    let negative = value < 0.0;
    let rounded = format!("{:.*}", max_decimals, value.abs());

    let (int_part, frac_part) = match rounded.split_once('.') {
        Some((i, f)) => (i, f),
        None => (rounded.as_str(), ""),
    };

    let grouped = group_thousands(int_part);
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Insère un séparateur de milliers tous les 3 chiffres depuis la droite
///
/// CONCEPT RUST : itération inversée avec index
/// - On reconstruit la string de droite à gauche puis on inverse
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out.chars().rev().collect()
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_krw_no_decimals_with_grouping() {
        assert_eq!(format_currency(1234.5, "KRW"), "1,235");
        assert_eq!(format_currency(1350000.0, "KRW"), "1,350,000");
    }

    #[test]
    fn test_jpy_no_decimals() {
        assert_eq!(format_currency(9876.4, "JPY"), "9,876");
    }

    #[test]
    fn test_usd_at_most_two_decimals() {
        assert_eq!(format_currency(1234.567, "USD"), "1,234.57");
        // Zéros de fin retirés
        assert_eq!(format_currency(1234.5, "USD"), "1,234.5");
        assert_eq!(format_currency(1234.0, "USD"), "1,234");
    }

    #[test]
    fn test_small_and_negative_values() {
        assert_eq!(format_currency(0.12, "EUR"), "0.12");
        assert_eq!(format_currency(-1234.5, "USD"), "-1,234.5");
        assert_eq!(format_currency(0.0, "KRW"), "0");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }

    #[test]
    fn test_format_unit_rate() {
        assert_eq!(format_unit_rate(1350.0, "KRW"), "1350.00");
        assert_eq!(format_unit_rate(0.9121621, "EUR"), "0.9122");
    }

    #[test]
    fn test_format_display_date() {
        assert_eq!(format_display_date("20240115"), "Au 2024.1.15");
        assert_eq!(format_display_date("20241204"), "Au 2024.12.4");
        // Malformé : string vide, jamais de panic
        assert_eq!(format_display_date(""), "");
        assert_eq!(format_display_date("2024011"), "");
        assert_eq!(format_display_date("abcdefgh"), "");
    }
}
