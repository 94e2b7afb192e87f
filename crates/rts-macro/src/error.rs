use rts_core::{Position, UnitId};
use thiserror::Error;

/// Why a macro action cannot be generated or resolved right now.
///
/// These are expected outcomes under fog of war. Callers fall back to another intent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Infeasible {
    #[error("no idle units")]
    NoIdleUnits,

    #[error("no idle cities")]
    NoIdleCities,

    #[error("no unclaimed empty cities in sight")]
    NoEmptyCities,

    #[error("no free units and no idle city to build from")]
    NoFreeUnits,

    #[error("no reachable unexplored tiles")]
    NoUnexploredTiles,

    #[error("no visible enemies")]
    NoVisibleEnemies,

    #[error("no reachable destination")]
    NoDestination,

    #[error("no legal tile next to {0}")]
    NoStagingTile(UnitId),

    #[error("no path from {from} to {to}")]
    PathNotFound { from: Position, to: Position },

    #[error("path exhausted")]
    PathExhausted,

    #[error("unit {0} no longer exists")]
    UnitMissing(UnitId),
}
