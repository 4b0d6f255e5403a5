//! Status helper enums mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data in the
//! corresponding `*_statuses` table. Rows decode the id column into the enum
//! (`#[sqlx(try_from = "i16")]`) and serialize it by variant name.

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

/// A status id read from the database that has no matching enum variant.
#[derive(Debug, thiserror::Error)]
#[error("Unknown {kind} id {id}")]
pub struct UnknownStatus {
    pub kind: &'static str,
    pub id: StatusId,
}

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl TryFrom<StatusId> for $name {
            type Error = UnknownStatus;

            fn try_from(value: StatusId) -> Result<Self, Self::Error> {
                $(
                    if value == $val {
                        return Ok(Self::$variant);
                    }
                )+
                Err(UnknownStatus {
                    kind: stringify!($name),
                    id: value,
                })
            }
        }
    };
}

define_status_enum! {
    /// Training lifecycle of a [`Model`](crate::models::model::Model).
    TrainingStatus {
        Pending = 1,
        Generated = 2,
    }
}

define_status_enum! {
    /// Generation lifecycle of an [`OutputImage`](crate::models::output_image::OutputImage).
    ImageStatus {
        Pending = 1,
        Generated = 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_seed_order() {
        assert_eq!(TrainingStatus::Pending.id(), 1);
        assert_eq!(TrainingStatus::Generated.id(), 2);
        assert_eq!(StatusId::from(ImageStatus::Generated), 2);
    }

    #[test]
    fn try_from_round_trips_known_ids() {
        assert_eq!(TrainingStatus::try_from(2).unwrap(), TrainingStatus::Generated);
        assert_eq!(ImageStatus::try_from(1).unwrap(), ImageStatus::Pending);
    }

    #[test]
    fn try_from_rejects_unknown_ids() {
        let err = ImageStatus::try_from(9).unwrap_err();
        assert_eq!(err.to_string(), "Unknown ImageStatus id 9");
    }

    #[test]
    fn serializes_by_name() {
        assert_eq!(
            serde_json::to_string(&TrainingStatus::Generated).unwrap(),
            r#""Generated""#
        );
    }
}
