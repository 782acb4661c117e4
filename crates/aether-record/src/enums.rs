//! Closed, codec-strict wire enumerations. Every `try_from` rejects any
//! raw value outside its declared set rather than coercing it — per the
//! schema error policy, unknown values at the same minor version are a
//! hard rejection, not a lenient default.

use thiserror::Error;

/// An unrecognized raw value was presented for a closed enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown {type_name} value: {raw}")]
pub struct UnknownEnumValue {
    /// The enumeration's name, for error messages.
    pub type_name: &'static str,
    /// The rejected raw byte.
    pub raw: u8,
}

macro_rules! closed_u8_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident = $value:expr),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            $(
                #[allow(missing_docs)]
                $variant,
            )+
        }

        impl $name {
            /// The raw wire byte for this variant.
            pub fn to_u8(self) -> u8 {
                match self {
                    $(Self::$variant => $value,)+
                }
            }

            /// Parses a raw wire byte, rejecting anything outside the
            /// closed set.
            pub fn try_from_u8(raw: u8) -> Result<Self, UnknownEnumValue> {
                match raw {
                    $($value => Ok(Self::$variant),)+
                    _ => Err(UnknownEnumValue {
                        type_name: stringify!($name),
                        raw,
                    }),
                }
            }
        }
    };
}

closed_u8_enum! {
    /// Final classification of a candidate decision record.
    Classification {
        Pending = 0,
        Rejected = 1,
        Accepted = 2,
    }
}

closed_u8_enum! {
    /// A guidance hint surfaced to the capture operator.
    GuidanceSignal {
        None = 0,
        CaptureMore = 1,
        AdjustAngle = 2,
        ImproveLighting = 3,
        HoldSteady = 4,
    }
}

closed_u8_enum! {
    /// The build mode a record was produced under.
    BuildMode {
        Preview = 0,
        Incremental = 1,
        Full = 2,
    }
}

closed_u8_enum! {
    /// The level of explainability data accompanying an export.
    OutputProfile {
        DecisionOnly = 0,
        FullExplainability = 1,
    }
}

closed_u8_enum! {
    /// The recommendation surfaced alongside a completed capture.
    GateRecommendation {
        AllowPublish = 0,
        Recapture = 1,
        InsufficientData = 2,
    }
}
