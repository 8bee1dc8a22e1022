// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global du dashboard TUI : derniers prix affichés, portefeuille
// en cours d'édition, citation courante, champ de particules décoratif.
//
// PATTERN : "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// - Garantit la cohérence de l'état
// ============================================================================

use std::collections::HashMap;

use chrono::{DateTime, Local};
use rand::Rng;

use crate::models::{valuate, Coin, Portfolio, PriceSnapshot, Valuation};

// ============================================================================
// ParticleField : animation décorative
// ============================================================================

/// Nombre de particules du champ
pub const PARTICLE_COUNT: usize = 150;

/// Dimensions logiques du champ, indépendantes du terminal
pub const FIELD_WIDTH: f64 = 100.0;
pub const FIELD_HEIGHT: f64 = 100.0;

/// Un point 2D indépendant avec position et vélocité
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

/// Champ de particules purement cosmétique
///
/// Mis à jour une fois par frame : position += vélocité, avec wrap
/// toroïdal (un point qui sort par un bord réapparaît au bord opposé,
/// jamais de rebond). Aucune interaction avec le reste de l'application.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Crée un champ de `count` particules à positions et vitesses aléatoires
    pub fn new(count: usize) -> Self {
        let mut rng = rand::rng();
        let particles = (0..count)
            .map(|_| Particle {
                x: rng.random_range(0.0..FIELD_WIDTH),
                y: rng.random_range(0.0..FIELD_HEIGHT),
                vx: rng.random_range(-0.75..0.75),
                vy: rng.random_range(-0.75..0.75),
            })
            .collect();
        Self { particles }
    }

    /// Avance toutes les particules d'une frame
    pub fn step(&mut self) {
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;

            // Wrap toroïdal sur chaque bord
            if p.x < 0.0 {
                p.x += FIELD_WIDTH;
            } else if p.x >= FIELD_WIDTH {
                p.x -= FIELD_WIDTH;
            }
            if p.y < 0.0 {
                p.y += FIELD_HEIGHT;
            } else if p.y >= FIELD_HEIGHT {
                p.y -= FIELD_HEIGHT;
            }
        }
    }

    /// Positions courantes, pour le widget Canvas
    pub fn positions(&self) -> Vec<(f64, f64)> {
        self.particles.iter().map(|p| (p.x, p.y)).collect()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

// ============================================================================
// Screen : écrans de l'application
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : prix + citation + particules
    Dashboard,

    /// Overlay portefeuille : quantités, valeurs, total
    Portfolio,

    /// Saisie d'une quantité pour le coin sélectionné
    InputMode,
}

/// Sens de variation d'un prix entre deux polls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceDirection {
    Up,
    Down,
    Flat,
}

/// État principal du dashboard
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Snapshot de prix affiché (le dernier poll réussi)
    pub prices: PriceSnapshot,

    /// Prix du poll précédent, pour les flèches de variation
    previous_prices: HashMap<Coin, f64>,

    /// Portefeuille en cours d'édition (copie locale du document)
    pub portfolio: Portfolio,

    /// Citation affichée
    pub quote: Option<String>,

    /// Heure du dernier poll de prix réussi
    pub last_updated: Option<DateTime<Local>>,

    /// Message de statut (sauvegarde, erreurs de poll, etc.)
    pub status: Option<String>,

    /// Coin sélectionné dans l'overlay portefeuille
    pub selected_index: usize,

    /// Buffer et prompt du mode saisie
    pub input_buffer: String,
    pub input_prompt: String,

    /// Sauvegarde en cours : la touche save est désactivée tant que la
    /// précédente n'est pas terminée (évite deux écritures concurrentes
    /// du même client)
    pub save_in_flight: bool,

    /// Confirmation de quit en deux temps
    pub confirm_quit: bool,

    /// Champ de particules décoratif
    pub particles: ParticleField,
}

impl App {
    /// Crée l'état initial : aucun prix, portefeuille vide
    pub fn new() -> Self {
        Self {
            running: true,
            current_screen: Screen::Dashboard,
            prices: PriceSnapshot::new(),
            previous_prices: HashMap::new(),
            portfolio: Portfolio::new(),
            quote: None,
            last_updated: None,
            status: None,
            selected_index: 0,
            input_buffer: String::new(),
            input_prompt: String::new(),
            save_in_flight: false,
            confirm_quit: false,
            particles: ParticleField::new(PARTICLE_COUNT),
        }
    }

    /// Tick : appelé à chaque itération de la boucle
    ///
    /// Seule l'animation avance ici ; les polls sont pilotés par des
    /// échéances dans la boucle principale.
    pub fn tick(&mut self) {
        self.particles.step();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Données : prix, citation, portefeuille
    // ========================================================================

    /// Applique un snapshot fraîchement pollé
    ///
    /// L'ancien snapshot devient la référence des flèches de variation.
    /// Le dernier poll résolu gagne : pas de déduplication des polls
    /// concurrents.
    pub fn apply_prices(&mut self, snapshot: PriceSnapshot) {
        self.previous_prices = Coin::ALL
            .iter()
            .filter_map(|&c| self.prices.usd(c).map(|p| (c, p)))
            .collect();
        self.prices = snapshot;
        self.last_updated = Some(Local::now());
    }

    /// Sens de variation d'un coin par rapport au poll précédent
    ///
    /// None tant qu'il n'y a pas deux polls comparables.
    pub fn price_direction(&self, coin: Coin) -> Option<PriceDirection> {
        let current = self.prices.usd(coin)?;
        let previous = *self.previous_prices.get(&coin)?;
        Some(if current > previous {
            PriceDirection::Up
        } else if current < previous {
            PriceDirection::Down
        } else {
            PriceDirection::Flat
        })
    }

    pub fn apply_quote(&mut self, quote: String) {
        self.quote = Some(quote);
    }

    pub fn apply_portfolio(&mut self, portfolio: Portfolio) {
        self.portfolio = portfolio;
    }

    /// Valorisation courante (recalculée, jamais stockée)
    pub fn valuation(&self) -> Valuation {
        valuate(&self.portfolio, &self.prices)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    // ========================================================================
    // Navigation et écrans
    // ========================================================================

    pub fn show_portfolio(&mut self) {
        self.current_screen = Screen::Portfolio;
        self.selected_index = 0;
    }

    pub fn show_dashboard(&mut self) {
        self.current_screen = Screen::Dashboard;
    }

    pub fn is_on_dashboard(&self) -> bool {
        self.current_screen == Screen::Dashboard
    }

    pub fn is_on_portfolio(&self) -> bool {
        self.current_screen == Screen::Portfolio
    }

    pub fn is_in_input_mode(&self) -> bool {
        self.current_screen == Screen::InputMode
    }

    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn navigate_down(&mut self) {
        let max_index = Coin::ALL.len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    /// Coin sélectionné dans l'overlay portefeuille
    pub fn selected_coin(&self) -> Coin {
        Coin::ALL[self.selected_index.min(Coin::ALL.len() - 1)]
    }

    // ========================================================================
    // Mode saisie : édition d'une quantité
    // ========================================================================

    /// Entre en saisie de quantité pour le coin sélectionné
    pub fn start_quantity_input(&mut self) {
        let coin = self.selected_coin();
        self.current_screen = Screen::InputMode;
        self.input_buffer.clear();
        self.input_prompt = format!("{} quantity: ", coin.symbol());
    }

    pub fn cancel_input(&mut self) {
        self.current_screen = Screen::Portfolio;
        self.input_buffer.clear();
        self.input_prompt.clear();
    }

    /// Valide la saisie et met à jour la quantité du coin sélectionné
    ///
    /// Une saisie non numérique retombe sur zéro, comme côté serveur :
    /// l'UI reste résiliente aux fautes de frappe.
    pub fn submit_quantity_input(&mut self) {
        let coin = self.selected_coin();
        let quantity = self.input_buffer.trim().parse::<f64>().unwrap_or(0.0);
        self.portfolio.set_quantity(coin, quantity);

        self.current_screen = Screen::Portfolio;
        self.input_buffer.clear();
        self.input_prompt.clear();
    }

    pub fn append_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    pub fn backspace(&mut self) {
        self.input_buffer.pop();
    }

    // ========================================================================
    // Sauvegarde
    // ========================================================================

    /// Marque une sauvegarde en cours (désactive la touche save)
    pub fn begin_save(&mut self) {
        self.save_in_flight = true;
    }

    /// Termine la sauvegarde en cours
    pub fn finish_save(&mut self) {
        self.save_in_flight = false;
    }

    pub fn can_save(&self) -> bool {
        !self.save_in_flight
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

    #[test]
    fn test_app_initial_state() {
        let app = App::new();
        assert!(app.is_running());
        assert!(app.prices.is_empty());
        assert!(app.portfolio.is_empty());
        assert!(app.can_save());
        assert_eq!(app.particles.len(), PARTICLE_COUNT);
    }

    #[test]
    fn test_price_direction_needs_two_polls() {
        let mut app = App::new();
        assert_eq!(app.price_direction(Coin::Bitcoin), None);

        app.apply_prices(PriceSnapshot::from_prices([(Coin::Bitcoin, 100.0)]));
        // Un seul poll : pas encore de référence
        assert_eq!(app.price_direction(Coin::Bitcoin), None);

        app.apply_prices(PriceSnapshot::from_prices([(Coin::Bitcoin, 120.0)]));
        assert_eq!(app.price_direction(Coin::Bitcoin), Some(PriceDirection::Up));

        app.apply_prices(PriceSnapshot::from_prices([(Coin::Bitcoin, 90.0)]));
        assert_eq!(
            app.price_direction(Coin::Bitcoin),
            Some(PriceDirection::Down)
        );
    }

    #[test]
    fn test_submit_invalid_quantity_falls_back_to_zero() {
        let mut app = App::new();
        app.show_portfolio();
        app.start_quantity_input();
        for c in "abc".chars() {
            app.append_char(c);
        }
        app.submit_quantity_input();

        assert_eq!(app.portfolio.quantity(Coin::Bitcoin), 0.0);
        assert!(app.is_on_portfolio());
    }

    #[test]
    fn test_navigation_bounded_by_coin_set() {
        let mut app = App::new();
        app.navigate_up();
        assert_eq!(app.selected_index, 0);

        for _ in 0..10 {
            app.navigate_down();
        }
        assert_eq!(app.selected_index, Coin::ALL.len() - 1);
    }

    #[test]
    fn test_particles_wrap_toroidally() {
        let mut field = ParticleField::new(0);
        field.particles = vec![
            // Sort à droite : réapparaît à gauche
            Particle { x: FIELD_WIDTH - 0.1, y: 50.0, vx: 0.5, vy: 0.0 },
            // Sort en bas : réapparaît en haut
            Particle { x: 50.0, y: 0.05, vx: 0.0, vy: -0.5 },
        ];

        field.step();

        let positions = field.positions();
        assert!(positions[0].0 < 1.0, "wrap droite -> gauche : {:?}", positions[0]);
        assert!(
            positions[1].1 > FIELD_HEIGHT - 1.0,
            "wrap bas -> haut : {:?}",
            positions[1]
        );
    }

    #[test]
    fn test_particle_count_is_stable() {
        let mut field = ParticleField::new(25);
        for _ in 0..500 {
            field.step();
        }
        assert_eq!(field.len(), 25);
        // Toutes les particules restent dans le champ
        for (x, y) in field.positions() {
            assert!((0.0..FIELD_WIDTH).contains(&x));
            assert!((0.0..FIELD_HEIGHT).contains(&y));
        }
    }

    #[test]
    fn test_save_in_flight_disables_save() {
        let mut app = App::new();
        assert!(app.can_save());
        app.begin_save();
        assert!(!app.can_save());
        app.finish_save();
        assert!(app.can_save());
    }
}
