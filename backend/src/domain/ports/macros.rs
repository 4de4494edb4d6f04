//! `define_port_error!`: adapter failure enums where every variant carries a
//! human-readable `message`.
//!
//! ```ignore
//! define_port_error! {
//!     pub enum LayoutStoreError {
//!         Connection => "layout store connection failed: {message}",
//!     }
//! }
//!
//! let err = LayoutStoreError::connection("pool exhausted");
//! ```

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $template:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($template)]
                $variant { message: String },
            )+
        }

        impl $name {
            $(
                ::paste::paste! {
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant { message: message.into() }
                    }
                }
            )+

            /// The adapter-supplied detail, without the variant's prefix.
            pub fn message(&self) -> &str {
                match self {
                    $(Self::$variant { message })|+ => message,
                }
            }
        }
    };
}

pub(crate) use define_port_error;
