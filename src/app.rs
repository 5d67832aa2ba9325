// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Ownership de l'état : la table des taux appartient à App et est
//    passée par référence au calculateur (le cœur reste sans effet de
//    bord, testable indépendamment)
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// - La table est remplacée d'un bloc à chaque refresh réussi
// ============================================================================

use crate::models::{currencies, CurrencyInfo, RatePoint, RateTable, BASE_CURRENCY};
use crate::rates::calculate_rate;

/// Écrans de l'application
///
/// CONCEPT RUST : Enum pour state machine
/// - Un seul écran actif à la fois
/// - Le compilateur force à gérer tous les cas (exhaustivité)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : convertisseur de devises
    Converter,

    /// Vue graphique : évolution du taux de la paire affichée
    ChartView,

    /// Mode saisie : capture du montant à convertir
    /// CONCEPT : Modal input mode (Vim-like)
    /// - Capture les touches pour construire un buffer
    /// - Enter valide, ESC annule
    InputMode,
}

/// Côté de la paire ciblé par la sélection de devise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    From,
    To,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Table des taux KRW, remplacée d'un bloc à chaque refresh
    pub table: RateTable,

    /// Index de la devise source dans le registre
    pub from_index: usize,

    /// Index de la devise cible dans le registre
    pub to_index: usize,

    /// Côté de la paire que ↑↓ fait défiler
    pub focused_side: Side,

    /// Montant à convertir
    pub amount: f64,

    /// Dernier taux from → to connu
    ///
    /// CONCEPT : Last-known rate
    /// - Un None du calculateur (entrée manquante) ne l'efface PAS :
    ///   on garde la dernière valeur affichable plutôt que de blanchir
    pub current_rate: Option<f64>,

    /// Série historique réorientée pour la paire affichée
    pub chart_data: Vec<RatePoint>,

    /// Période du graphique en jours (7 ou 30)
    pub chart_period: u32,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Indique si l'utilisateur a demandé à quitter (attend confirmation)
    /// CONCEPT : Two-step quit pour éviter les sorties accidentelles
    pub confirm_quit: bool,

    /// Indique si des données sont en cours de chargement
    pub is_loading: bool,

    /// Message de chargement optionnel
    pub loading_message: Option<String>,

    /// Message d'erreur utilisateur (table vide après refresh)
    pub error_message: Option<String>,

    /// Buffer de saisie pour le mode Input (montant)
    pub input_buffer: String,

    /// Prompt affiché en mode Input
    pub input_prompt: String,
}

impl App {
    /// Crée une nouvelle instance avec la paire par défaut USD → KRW
    pub fn new() -> Self {
        Self {
            running: true,
            table: RateTable::new(),
            from_index: 1, // USD
            to_index: 0,   // KRW
            focused_side: Side::From,
            amount: 1.0,
            current_rate: None,
            chart_data: Vec::new(),
            chart_period: 7,
            current_screen: Screen::Converter,
            confirm_quit: false,
            is_loading: false,
            loading_message: None,
            error_message: None,
            input_buffer: String::new(),
            input_prompt: String::new(),
        }
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Tick : appelé à chaque itération de la boucle
    pub fn tick(&mut self) {
        // Rien à faire à chaque tick pour l'instant
    }

    // ========================================================================
    // Paire de devises
    // ========================================================================

    /// Devise source de la paire affichée
    pub fn from_currency(&self) -> &'static CurrencyInfo {
        &currencies()[self.from_index]
    }

    /// Devise cible de la paire affichée
    pub fn to_currency(&self) -> &'static CurrencyInfo {
        &currencies()[self.to_index]
    }

    /// Devise non-KRW de la paire, celle dont on fetch la série
    ///
    /// None si les deux côtés sont le KRW (paire identité : pas de
    /// graphique possible ni nécessaire).
    pub fn chart_currency(&self) -> Option<&'static CurrencyInfo> {
        if self.from_currency().code != BASE_CURRENCY {
            Some(self.from_currency())
        } else if self.to_currency().code != BASE_CURRENCY {
            Some(self.to_currency())
        } else {
            None
        }
    }

    /// Échange les deux devises de la paire
    pub fn swap_currencies(&mut self) {
        std::mem::swap(&mut self.from_index, &mut self.to_index);
        self.recalculate_rate();
    }

    /// Bascule le côté de la paire ciblé par la sélection
    pub fn toggle_focus(&mut self) {
        self.focused_side = match self.focused_side {
            Side::From => Side::To,
            Side::To => Side::From,
        };
    }

    /// Fait défiler la devise du côté focalisé
    ///
    /// Si la nouvelle sélection tombe sur la devise de l'autre côté,
    /// les deux côtés sont échangés au lieu de dupliquer la devise
    /// (comportement du sélecteur d'origine).
    pub fn cycle_currency(&mut self, forward: bool) {
        let len = currencies().len();
        let step = if forward { 1 } else { len - 1 };

        let (own, other) = match self.focused_side {
            Side::From => (&mut self.from_index, &mut self.to_index),
            Side::To => (&mut self.to_index, &mut self.from_index),
        };

        let previous = *own;
        let next = (*own + step) % len;

        if next == *other {
            *other = previous;
        }
        *own = next;

        self.recalculate_rate();
    }

    // ========================================================================
    // Taux et conversion
    // ========================================================================

    /// Remplace la table des taux d'un bloc après un refresh
    ///
    /// Une table vide signifie que toutes les devises ont échoué : on
    /// affiche un message d'erreur avec invitation à réessayer, et on
    /// garde l'ancienne table plutôt que de perdre les derniers taux.
    pub fn set_table(&mut self, table: RateTable) {
        if table.is_empty() {
            self.error_message =
                Some("Impossible de récupérer les taux. Réessayez avec [r].".to_string());
            return;
        }

        self.error_message = None;
        self.table = table;
        self.recalculate_rate();
    }

    /// Recalcule le taux de la paire affichée depuis la table
    ///
    /// Un None du calculateur (taux indisponible) conserve le dernier
    /// taux connu au lieu de l'effacer.
    pub fn recalculate_rate(&mut self) {
        if let Some(rate) =
            calculate_rate(self.from_currency().code, self.to_currency().code, &self.table)
        {
            self.current_rate = Some(rate);
        }
    }

    /// Montant converti avec le taux courant
    pub fn converted_amount(&self) -> Option<f64> {
        self.current_rate.map(|rate| self.amount * rate)
    }

    // ========================================================================
    // Graphique
    // ========================================================================

    /// Remplace la série du graphique
    ///
    /// CONCEPT : Last-resolved-wins
    /// - Pas d'annulation des fetchs en vol : un résultat obsolète qui
    ///   arrive après un plus récent écrase simplement l'état. Course
    ///   bénigne assumée (caractérisée par les tests, pas "corrigée").
    pub fn set_chart_data(&mut self, points: Vec<RatePoint>) {
        self.chart_data = points;
    }

    /// Bascule la période du graphique entre 7 et 30 jours
    pub fn toggle_chart_period(&mut self) {
        self.chart_period = if self.chart_period == 7 { 30 } else { 7 };
    }

    /// Affiche la vue graphique
    pub fn show_chart(&mut self) {
        self.current_screen = Screen::ChartView;
    }

    /// Retourne à la vue convertisseur
    pub fn show_converter(&mut self) {
        self.current_screen = Screen::Converter;
    }

    /// Vérifie si on est sur le convertisseur
    pub fn is_on_converter(&self) -> bool {
        self.current_screen == Screen::Converter
    }

    /// Vérifie si on est sur la vue graphique
    pub fn is_on_chart(&self) -> bool {
        self.current_screen == Screen::ChartView
    }

    // ========================================================================
    // Loading State
    // ========================================================================

    /// Démarre le chargement avec un message optionnel
    pub fn start_loading(&mut self, message: Option<String>) {
        self.is_loading = true;
        self.loading_message = message;
    }

    /// Termine le chargement
    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.loading_message = None;
    }

    /// Vérifie si des données sont en cours de chargement
    pub fn is_loading_data(&self) -> bool {
        self.is_loading
    }

    // ========================================================================
    // Quit Confirmation
    // ========================================================================

    /// Demande la confirmation de quitter
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    /// Annule la demande de quit
    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    /// Vérifie si on attend la confirmation de quit
    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Input Mode (saisie du montant)
    // ========================================================================

    /// Entre en mode input avec un prompt donné
    pub fn start_input(&mut self, prompt: String) {
        self.current_screen = Screen::InputMode;
        self.input_buffer.clear();
        self.input_prompt = prompt;
    }

    /// Annule le mode input et retourne au convertisseur
    pub fn cancel_input(&mut self) {
        self.current_screen = Screen::Converter;
        self.input_buffer.clear();
        self.input_prompt.clear();
    }

    /// Valide la saisie et met à jour le montant
    ///
    /// Une saisie non numérique est ignorée (le montant précédent est
    /// conservé) ; une saisie vide vaut 0.
    pub fn submit_input(&mut self) {
        let raw = self.input_buffer.trim().to_string();
        self.current_screen = Screen::Converter;
        self.input_buffer.clear();
        self.input_prompt.clear();

        if raw.is_empty() {
            self.amount = 0.0;
        } else if let Ok(value) = raw.parse::<f64>() {
            self.amount = value;
        }
    }

    /// Ajoute un caractère au buffer d'input
    pub fn append_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    /// Supprime le dernier caractère du buffer
    pub fn backspace(&mut self) {
        self.input_buffer.pop();
    }

    /// Vérifie si on est en mode input
    pub fn is_in_input_mode(&self) -> bool {
        self.current_screen == Screen::InputMode
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_table() -> RateTable {
        let mut table = RateTable::new();
        table.rates.insert("USD".to_string(), 1350.0);
        table.rates.insert("EUR".to_string(), 1480.0);
        table.reference_date = "20240115".to_string();
        table
    }

    #[test]
    fn test_default_pair_usd_to_krw() {
        let app = App::new();
        assert_eq!(app.from_currency().code, "USD");
        assert_eq!(app.to_currency().code, "KRW");
        assert_eq!(app.amount, 1.0);
    }

    #[test]
    fn test_set_table_recalculates() {
        let mut app = App::new();
        app.set_table(loaded_table());

        assert_eq!(app.current_rate, Some(1350.0));
        assert_eq!(app.converted_amount(), Some(1350.0));
        assert!(app.error_message.is_none());
    }

    #[test]
    fn test_empty_table_surfaces_error_and_keeps_rates() {
        let mut app = App::new();
        app.set_table(loaded_table());

        // Refresh totalement raté : table vide
        app.set_table(RateTable::new());

        assert!(app.error_message.is_some());
        // L'ancienne table et le taux affiché survivent
        assert_eq!(app.table.get("USD"), Some(1350.0));
        assert_eq!(app.current_rate, Some(1350.0));
    }

    #[test]
    fn test_last_known_rate_retained_on_missing_entry() {
        let mut app = App::new();
        app.set_table(loaded_table());
        assert_eq!(app.current_rate, Some(1350.0));

        // Sélectionne une devise absente de la table : le calcul rend
        // None, le dernier taux connu reste affiché
        app.focused_side = Side::To;
        app.to_index = currencies().iter().position(|c| c.code == "GBP").unwrap();
        app.recalculate_rate();

        assert_eq!(app.current_rate, Some(1350.0));
    }

    #[test]
    fn test_swap() {
        let mut app = App::new();
        app.set_table(loaded_table());
        app.swap_currencies();

        assert_eq!(app.from_currency().code, "KRW");
        assert_eq!(app.to_currency().code, "USD");
        let rate = app.current_rate.unwrap();
        assert!((rate - 1.0 / 1350.0).abs() < 1e-12);
    }

    #[test]
    fn test_cycle_collision_swaps_sides() {
        let mut app = App::new();
        // from = USD (1), to = KRW (0) ; reculer from d'un cran tombe
        // sur KRW : les côtés s'échangent au lieu de dupliquer
        app.cycle_currency(false);

        assert_eq!(app.from_currency().code, "KRW");
        assert_eq!(app.to_currency().code, "USD");
    }

    #[test]
    fn test_chart_currency_is_non_base_side() {
        let mut app = App::new();
        assert_eq!(app.chart_currency().unwrap().code, "USD");

        app.swap_currencies(); // KRW → USD
        assert_eq!(app.chart_currency().unwrap().code, "USD");
    }

    #[test]
    fn test_chart_last_resolved_wins() {
        // Course bénigne : un résultat obsolète qui arrive APRÈS un
        // plus récent écrase l'état (le dernier résolu gagne, pas le
        // dernier demandé). On caractérise, on ne corrige pas.
        let mut app = App::new();

        let newer = vec![RatePoint::new("1/15", 1350.0)];
        let stale = vec![RatePoint::new("1/10", 1300.0)];

        app.set_chart_data(newer);
        app.set_chart_data(stale.clone());

        assert_eq!(app.chart_data, stale);
    }

    #[test]
    fn test_toggle_chart_period() {
        let mut app = App::new();
        assert_eq!(app.chart_period, 7);
        app.toggle_chart_period();
        assert_eq!(app.chart_period, 30);
        app.toggle_chart_period();
        assert_eq!(app.chart_period, 7);
    }

    #[test]
    fn test_amount_input() {
        let mut app = App::new();
        app.start_input("Montant : ".to_string());
        assert!(app.is_in_input_mode());

        for c in "123.5".chars() {
            app.append_char(c);
        }
        app.backspace();
        app.append_char('5');
        app.submit_input();

        assert!(!app.is_in_input_mode());
        assert_eq!(app.amount, 123.5);
    }

    #[test]
    fn test_invalid_amount_keeps_previous() {
        let mut app = App::new();
        app.amount = 42.0;

        app.start_input("Montant : ".to_string());
        app.append_char('1');
        app.append_char('.');
        app.append_char('.');
        app.submit_input();

        assert_eq!(app.amount, 42.0);
    }

    #[test]
    fn test_quit_confirmation() {
        let mut app = App::new();
        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());
        app.quit();
        assert!(!app.is_running());
    }
}
