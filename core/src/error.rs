use core::fmt;

/// Named invariant checks over the live engine state. The harness validates
/// after every tick; a violation means the build is broken, not the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleCode {
    ModeRunningConsistency,
    SpeedClamp,
    FuelClamp,
    EmptyFlagCoherence,
    PlayerBounds,
    LaneBookkeeping,
    EntityState,
    RoadSegmentBand,
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModeRunningConsistency => write!(f, "MODE_RUNNING_CONSISTENCY"),
            Self::SpeedClamp => write!(f, "SPEED_CLAMP"),
            Self::FuelClamp => write!(f, "FUEL_CLAMP"),
            Self::EmptyFlagCoherence => write!(f, "EMPTY_FLAG_COHERENCE"),
            Self::PlayerBounds => write!(f, "PLAYER_BOUNDS"),
            Self::LaneBookkeeping => write!(f, "LANE_BOOKKEEPING"),
            Self::EntityState => write!(f, "ENTITY_STATE"),
            Self::RoadSegmentBand => write!(f, "ROAD_SEGMENT_BAND"),
        }
    }
}

impl std::error::Error for RuleCode {}

/// Errors that can occur during tape deserialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TapeError {
    TooShort,
    InvalidMagic(u32),
    UnsupportedVersion(u8),
    Truncated { expected: usize, got: usize },
    TrailingData { expected: usize, got: usize },
    CrcMismatch { stored: u32, computed: u32 },
    ReservedBitsSet { tick: u32, byte: u8 },
}

impl fmt::Display for TapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TapeError::TooShort => write!(f, "tape too short"),
            TapeError::InvalidMagic(m) => write!(f, "invalid tape magic: 0x{m:08x}"),
            TapeError::UnsupportedVersion(v) => write!(f, "unsupported tape version: {v}"),
            TapeError::Truncated { expected, got } => {
                write!(f, "tape truncated: expected {expected} bytes, got {got}")
            }
            TapeError::TrailingData { expected, got } => {
                write!(f, "tape has trailing data: expected {expected} bytes, got {got}")
            }
            TapeError::CrcMismatch { stored, computed } => {
                write!(f, "crc mismatch: stored=0x{stored:08x}, computed=0x{computed:08x}")
            }
            TapeError::ReservedBitsSet { tick, byte } => {
                write!(f, "reserved bits set in tick {tick}: 0x{byte:02x}")
            }
        }
    }
}

impl std::error::Error for TapeError {}
