/// Defines an `f64` newtype that only admits values in `$range`, together
/// with its error type, a serde bridge through `f64` and a total order.
macro_rules! bounded_f64 {
    (
        $(#[$meta:meta])*
        $name:ident, $error:ident, $range:literal, |$value:ident| $contains:expr
    ) => {
        #[derive(Debug)]
        #[allow(clippy::module_name_repetitions)]
        pub struct $error(f64);

        impl core::fmt::Display for $error {
            fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::fmt::Result {
                write!(fmt, "{} is not in {}.", self.0, $range)
            }
        }

        $(#[$meta])*
        #[derive(Copy, Clone, serde::Deserialize, serde::Serialize)]
        #[repr(transparent)]
        #[serde(try_from = "f64", into = "f64")]
        pub struct $name(f64);

        impl $name {
            /// # Errors
            ///
            #[doc = concat!("Returns `", stringify!($error), "` if the value is not in ", $range)]
            pub fn new($value: f64) -> Result<Self, $error> {
                if $contains {
                    Ok(Self($value))
                } else {
                    Err($error($value))
                }
            }

            /// # Safety
            ///
            #[doc = concat!("Only safe iff the value is in ", $range)]
            #[must_use]
            pub const unsafe fn new_unchecked(value: f64) -> Self {
                Self(value)
            }

            #[must_use]
            pub const fn get(self) -> f64 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, fmt)
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::fmt::Result {
                write!(fmt, "{}({} in {})", stringify!($name), self.0, $range)
            }
        }

        impl TryFrom<f64> for $name {
            type Error = $error;

            fn try_from(value: f64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for f64 {
            fn from(val: $name) -> Self {
                val.get()
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.0.eq(&other.0)
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> core::cmp::Ordering {
                self.0.total_cmp(&other.0)
            }
        }

        impl PartialEq<f64> for $name {
            fn eq(&self, other: &f64) -> bool {
                self.0.eq(other)
            }
        }

        impl PartialOrd<f64> for $name {
            fn partial_cmp(&self, other: &f64) -> Option<core::cmp::Ordering> {
                self.0.partial_cmp(other)
            }
        }
    };
}
