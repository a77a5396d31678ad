//! Navigation state: the mounted view and the selected gallery card.
//!
//! The navigation state is decoupled from the data it navigates. It keeps an
//! index that is clamped against the current card count on every render.

// ============================================================================
// View
// ============================================================================

/// The top-level pages of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Mint the next NFT.
    #[default]
    Minter,
    /// Owned and staked NFTs of the connected account.
    Gallery,
}

impl View {
    pub const ALL: [Self; 2] = [Self::Minter, Self::Gallery];

    /// Cycles to the next view.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Minter => Self::Gallery,
            Self::Gallery => Self::Minter,
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Minter => "Minter",
            Self::Gallery => "My gallery",
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Minter => 0,
            Self::Gallery => 1,
        }
    }
}

// ============================================================================
// Navigation State
// ============================================================================

#[derive(Debug, Default)]
pub struct NavigationState {
    view: View,
    /// Index into the gallery's cards (owned first, then staked).
    selected_card: Option<usize>,
}

impl NavigationState {
    #[must_use]
    pub fn new(view: View) -> Self {
        Self {
            view,
            selected_card: None,
        }
    }

    #[must_use]
    pub const fn view(&self) -> View {
        self.view
    }

    /// Switches view. Returns `false` if `view` is already mounted.
    pub fn set_view(&mut self, view: View) -> bool {
        if self.view == view {
            return false;
        }
        self.view = view;
        self.selected_card = None;
        true
    }

    /// Selected card, clamped to `count`.
    #[must_use]
    pub fn selected_card(&self, count: usize) -> Option<usize> {
        match (self.selected_card, count) {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(index), count) => Some(index.min(count - 1)),
        }
    }

    pub fn select_next(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let current = self.selected_card(count).unwrap_or(0);
        self.selected_card = Some((current + 1).min(count - 1));
    }

    pub fn select_previous(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let current = self.selected_card(count).unwrap_or(0);
        self.selected_card = Some(current.saturating_sub(1));
    }
}

// ============================================================================
// Tests
// ============================================================================
