//! Typed filter recipes.
//!
//! A [`Recipe`] picks one of eleven families; each family is a closed enum of
//! operations, and each operation is a plain config struct with named fields.
//! Optional parameters are `Option<T>` and are only sent to the engine when
//! set. Parameters that define the operation (a composite's background, a
//! barcode's message, a generator's color) are plain values and always sent.
//!
//! ```
//! use filterchain::recipe::{Blur, MotionBlur, Recipe};
//!
//! let recipe: Recipe = MotionBlur { angle: Some(30.0), ..Default::default() }.into();
//! assert_eq!(recipe.token().as_str(), "CIMotionBlur");
//! assert!(matches!(recipe, Recipe::Blur(Blur::Motion(_))));
//! ```
//!
//! | Family | Module |
//! |---|---|
//! | Blur | [`blur`] |
//! | Sharpen | [`sharpen`] |
//! | ColorAdjustment | [`color_adjustment`] |
//! | ColorEffect | [`color_effect`] |
//! | CompositeOperation | [`composite`] |
//! | DistortionEffect | [`distortion`] |
//! | Stylize | [`stylize`] |
//! | TileEffect | [`tile`] |
//! | HalftoneEffect | [`halftone`] |
//! | Generator | [`generator`] |
//! | Gradient | [`gradient`] |
//!
//! Recipes also deserialize from recipe files; see [`file`].

use crate::convert::EngineValue;
use serde::Deserialize;
use std::fmt;

/// Declares one recipe family.
///
/// For every operation row this generates the config struct, its
/// [`SubRecipe`] impl (field order is option order), `From` conversions into
/// the family and into [`Recipe`], and a `CATALOG` entry on the family enum.
macro_rules! recipe_family {
    (
        $(#[$family_meta:meta])*
        pub enum $family:ident {
            $(
                $(#[$op_meta:meta])*
                $variant:ident($name:literal) => $op:ident($token:literal) {
                    $( $(#[$field_meta:meta])* $field:ident: $ty:ty => $key:ident ),* $(,)?
                }
            ),* $(,)?
        }
    ) => {
        $(
            $(#[$op_meta])*
            #[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
            #[serde(deny_unknown_fields)]
            pub struct $op {
                $( $(#[$field_meta])* pub $field: $ty, )*
            }

            impl $crate::recipe::SubRecipe for $op {
                fn token(&self) -> $crate::recipe::Token {
                    $crate::recipe::Token::new($token)
                }

                fn options(
                    &self,
                ) -> Vec<($crate::recipe::OptionKey, Option<$crate::convert::EngineValue>)> {
                    vec![
                        $((
                            $crate::recipe::OptionKey::$key,
                            $crate::convert::OptionParam::to_option(&self.$field),
                        ),)*
                    ]
                }
            }

            impl From<$op> for $family {
                fn from(op: $op) -> Self {
                    $family::$variant(op)
                }
            }

            impl From<$op> for $crate::recipe::Recipe {
                fn from(op: $op) -> Self {
                    $family::$variant(op).into()
                }
            }
        )*

        $(#[$family_meta])*
        #[derive(Debug, Clone, PartialEq, serde::Deserialize)]
        #[serde(tag = "operation")]
        pub enum $family {
            $( #[serde(rename = $name)] $variant($op), )*
        }

        impl $family {
            /// `(operation name, engine token)` for every operation, in declaration order.
            pub const CATALOG: &'static [(&'static str, &'static str)] = &[$(($name, $token),)*];

            pub fn operation(&self) -> &dyn $crate::recipe::SubRecipe {
                match self {
                    $($family::$variant(op) => op,)*
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $($family::$variant(_) => $name,)*
                }
            }
        }
    };
}

pub mod blur;
pub mod color_adjustment;
pub mod color_effect;
pub mod composite;
pub mod distortion;
pub mod file;
pub mod generator;
pub mod gradient;
pub mod halftone;
pub mod keys;
pub mod sharpen;
pub mod stylize;
pub mod tile;

pub use blur::*;
pub use color_adjustment::*;
pub use color_effect::*;
pub use composite::*;
pub use distortion::*;
pub use generator::*;
pub use gradient::*;
pub use halftone::*;
pub use keys::OptionKey;
pub use sharpen::*;
pub use stylize::*;
pub use tile::*;

/// Name of an engine operation, e.g. `CIGaussianBlur`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token(&'static str);

impl Token {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// One concrete operation: its engine token and its parameters in
/// declaration order. Unset parameters appear as `None` here and are dropped
/// by [`resolve`](crate::resolve::resolve).
pub trait SubRecipe {
    fn token(&self) -> Token;
    fn options(&self) -> Vec<(OptionKey, Option<EngineValue>)>;
}

macro_rules! recipe_families {
    ($($variant:ident($family:ident) = $name:literal),* $(,)?) => {
        /// A single pipeline stage.
        #[derive(Debug, Clone, PartialEq, Deserialize)]
        #[serde(tag = "family")]
        pub enum Recipe {
            $( #[serde(rename = $name)] $variant($family), )*
        }

        impl Recipe {
            /// Every family with its operation catalogue.
            pub const FAMILIES: &'static [(&'static str, &'static [(&'static str, &'static str)])] =
                &[$(($name, $family::CATALOG),)*];

            pub fn family(&self) -> &'static str {
                match self {
                    $(Recipe::$variant(_) => $name,)*
                }
            }

            pub fn sub_recipe(&self) -> &dyn SubRecipe {
                match self {
                    $(Recipe::$variant(family) => family.operation(),)*
                }
            }

            /// Operation name within the family, as used in recipe files.
            pub fn operation_name(&self) -> &'static str {
                match self {
                    $(Recipe::$variant(family) => family.name(),)*
                }
            }
        }

        $(
            impl From<$family> for Recipe {
                fn from(family: $family) -> Self {
                    Recipe::$variant(family)
                }
            }
        )*
    };
}

recipe_families! {
    Blur(Blur) = "blur",
    Sharpen(Sharpen) = "sharpen",
    ColorAdjustment(ColorAdjustment) = "color_adjustment",
    ColorEffect(ColorEffect) = "color_effect",
    CompositeOperation(CompositeOperation) = "composite_operation",
    DistortionEffect(DistortionEffect) = "distortion_effect",
    Stylize(Stylize) = "stylize",
    TileEffect(TileEffect) = "tile_effect",
    HalftoneEffect(HalftoneEffect) = "halftone_effect",
    Generator(Generator) = "generator",
    Gradient(Gradient) = "gradient",
}

impl Recipe {
    /// Generator and gradient recipes produce an image from nothing and take
    /// no primary input.
    pub fn is_generator(&self) -> bool {
        matches!(self, Recipe::Generator(_) | Recipe::Gradient(_))
    }

    pub fn token(&self) -> Token {
        self.sub_recipe().token()
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.family(), self.operation_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_token_is_non_empty_and_unique() {
        let mut seen = HashSet::new();
        for (_, catalog) in Recipe::FAMILIES {
            for (name, token) in *catalog {
                assert!(!token.is_empty(), "{name} has an empty token");
                assert!(seen.insert(*token), "{token} listed twice");
            }
        }
        assert_eq!(Recipe::FAMILIES.len(), 11);
    }

    #[test]
    fn operation_names_are_unique_within_each_family() {
        for (family, catalog) in Recipe::FAMILIES {
            let mut names = HashSet::new();
            for (name, _) in *catalog {
                assert!(names.insert(*name), "{family}.{name} listed twice");
            }
        }
    }

    #[test]
    fn generator_families_are_flagged() {
        let constant: Recipe = ConstantColorGenerator::default().into();
        let linear: Recipe = LinearGradient::default().into();
        let blur: Recipe = GaussianBlur::default().into();
        assert!(constant.is_generator());
        assert!(linear.is_generator());
        assert!(!blur.is_generator());
    }

    #[test]
    fn display_names_family_and_operation() {
        let recipe: Recipe = MotionBlur::default().into();
        assert_eq!(recipe.to_string(), "blur.motion");
        assert_eq!(recipe.token(), Token::new("CIMotionBlur"));
    }
}
