use std::collections::HashMap;

/// Side length of one sprite-sheet cell in pixels.
pub const CELL_SIZE: f32 = 32.0;

/// Every named sprite set the companion can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteState {
    Idle,
    Alert,
    ScratchSelf,
    ScratchWallN,
    ScratchWallS,
    ScratchWallE,
    ScratchWallW,
    Tired,
    Sleeping,
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl SpriteState {
    pub const ALL: [SpriteState; 17] = [
        Self::Idle,
        Self::Alert,
        Self::ScratchSelf,
        Self::ScratchWallN,
        Self::ScratchWallS,
        Self::ScratchWallE,
        Self::ScratchWallW,
        Self::Tired,
        Self::Sleeping,
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
        Self::NW,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Alert => "alert",
            Self::ScratchSelf => "scratchSelf",
            Self::ScratchWallN => "scratchWallN",
            Self::ScratchWallS => "scratchWallS",
            Self::ScratchWallE => "scratchWallE",
            Self::ScratchWallW => "scratchWallW",
            Self::Tired => "tired",
            Self::Sleeping => "sleeping",
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        }
    }

    /// Case-sensitive reverse of [`SpriteState::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

/// Cell offset into the sprite sheet, in cells (not pixels).
/// Offsets are non-positive, matching a CSS-style background position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpriteOffset {
    pub x: i32,
    pub y: i32,
}

impl SpriteOffset {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Pixel offset for a sheet with [`CELL_SIZE`] cells.
    pub fn pixels(self) -> (f32, f32) {
        (self.x as f32 * CELL_SIZE, self.y as f32 * CELL_SIZE)
    }

    /// Column/row of the cell inside the sheet.
    pub fn cell(self) -> (u32, u32) {
        (self.x.unsigned_abs(), self.y.unsigned_abs())
    }
}

const fn o(x: i32, y: i32) -> SpriteOffset {
    SpriteOffset::new(x, y)
}

/// Layout of the classic 256x128 oneko sheet.
const CLASSIC_SHEET: &[(SpriteState, &[SpriteOffset])] = &[
    (SpriteState::Idle, &[o(-3, -3)]),
    (SpriteState::Alert, &[o(-7, -3)]),
    (SpriteState::ScratchSelf, &[o(-5, 0), o(-6, 0), o(-7, 0)]),
    (SpriteState::ScratchWallN, &[o(0, 0), o(0, -1)]),
    (SpriteState::ScratchWallS, &[o(-7, -1), o(-6, -2)]),
    (SpriteState::ScratchWallE, &[o(-2, -2), o(-2, -3)]),
    (SpriteState::ScratchWallW, &[o(-4, 0), o(-4, -1)]),
    (SpriteState::Tired, &[o(-3, -2)]),
    (SpriteState::Sleeping, &[o(-2, 0), o(-2, -1)]),
    (SpriteState::N, &[o(-1, -2), o(-1, -3)]),
    (SpriteState::NE, &[o(0, -2), o(0, -3)]),
    (SpriteState::E, &[o(-3, 0), o(-3, -1)]),
    (SpriteState::SE, &[o(-5, -1), o(-5, -2)]),
    (SpriteState::S, &[o(-6, -3), o(-7, -2)]),
    (SpriteState::SW, &[o(-5, -3), o(-6, -1)]),
    (SpriteState::W, &[o(-4, -2), o(-4, -3)]),
    (SpriteState::NW, &[o(-1, 0), o(-1, -1)]),
];

/// Immutable sprite lookup table: state → ordered cell sequence.
///
/// Lookups never fail. A state without a (non-empty) sequence renders the
/// idle sprite, and an atlas without idle renders cell (0, 0).
#[derive(Debug, Clone)]
pub struct SpriteAtlas {
    sets: HashMap<SpriteState, Vec<SpriteOffset>>,
}

impl SpriteAtlas {
    pub fn empty() -> Self {
        Self {
            sets: HashMap::new(),
        }
    }

    /// Replace (or add) the sequence for one state.
    pub fn with_set(mut self, state: SpriteState, frames: &[SpriteOffset]) -> Self {
        self.sets.insert(state, frames.to_vec());
        self
    }

    /// Sequence for `state`, falling back to idle.
    pub fn sequence(&self, state: SpriteState) -> &[SpriteOffset] {
        match self.sets.get(&state) {
            Some(seq) if !seq.is_empty() => seq.as_slice(),
            _ => self
                .sets
                .get(&SpriteState::Idle)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }

    /// Cell for `state` at `frame`, wrapping with `frame mod len`.
    pub fn frame(&self, state: SpriteState, frame: u64) -> SpriteOffset {
        let seq = self.sequence(state);
        if seq.is_empty() {
            return SpriteOffset::default();
        }
        seq[(frame % seq.len() as u64) as usize]
    }
}

impl Default for SpriteAtlas {
    fn default() -> Self {
        CLASSIC_SHEET
            .iter()
            .fold(Self::empty(), |atlas, (state, frames)| {
                atlas.with_set(*state, frames)
            })
    }
}
