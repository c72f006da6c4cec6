//! Unit-tagged physical quantities.
//!
//! Gas-property and pore-diffusion correlations are published in mixed
//! CGS/SI units. These newtypes make every conversion an explicit call at
//! the boundary of a correlation, so `Diffusivity::from_cm2_per_s(d)` is
//! visible in review where a bare `* 1e-4` would not be.
//!
//! All types store SI internally.

use std::fmt;

// =============================================================================
// Conversion factors
// =============================================================================

/// Meters per centimeter
pub const M_PER_CM: f64 = 1e-2;

/// Square meters per square centimeter
pub const M2_PER_CM2: f64 = 1e-4;

/// Pascals per standard atmosphere
pub const PA_PER_ATM: f64 = 101_325.0;

/// Pascals per kilopascal
pub const PA_PER_KPA: f64 = 1e3;

/// Pa·s per poise (g/cm/s)
pub const PA_S_PER_POISE: f64 = 0.1;

/// kg/mol per g/mol
pub const KG_PER_G: f64 = 1e-3;

/// mol/m³ per mol/L
pub const MOL_M3_PER_MOL_L: f64 = 1e3;

macro_rules! define_quantity {
    (
        $(#[$meta:meta])*
        $name:ident, $si_unit:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
        #[repr(transparent)]
        pub struct $name(f64);

        impl $name {
            /// Zero quantity.
            pub const ZERO: Self = Self(0.0);

            /// Raw SI value.
            #[inline]
            pub fn into_inner(self) -> f64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.6e} {}", self.0, $si_unit)
            }
        }

        impl From<$name> for f64 {
            #[inline]
            fn from(q: $name) -> f64 {
                q.0
            }
        }
    };
}

define_quantity!(
    /// A length (pore diameter, particle diameter, hydraulic diameter).
    ///
    /// # Example
    ///
    /// ```
    /// use fe_kernels::types::Length;
    ///
    /// let d = Length::from_centimeters(0.5);
    /// assert!((d.meters() - 0.005).abs() < 1e-15);
    /// ```
    Length,
    "m"
);

define_quantity!(
    /// Absolute pressure.
    Pressure,
    "Pa"
);

define_quantity!(
    /// A diffusivity (molecular, Knudsen, effective).
    Diffusivity,
    "m^2/s"
);

define_quantity!(
    /// Dynamic viscosity.
    Viscosity,
    "Pa*s"
);

define_quantity!(
    /// Molar mass of a species.
    MolarMass,
    "kg/mol"
);

define_quantity!(
    /// Molar concentration.
    Concentration,
    "mol/m^3"
);

impl Length {
    /// Length from meters.
    #[inline]
    pub const fn from_meters(m: f64) -> Self {
        Self(m)
    }

    /// Length from centimeters.
    #[inline]
    pub fn from_centimeters(cm: f64) -> Self {
        Self(cm * M_PER_CM)
    }

    /// Value in meters.
    #[inline]
    pub fn meters(self) -> f64 {
        self.0
    }

    /// Value in centimeters.
    #[inline]
    pub fn centimeters(self) -> f64 {
        self.0 / M_PER_CM
    }
}

impl Pressure {
    /// Pressure from pascals.
    #[inline]
    pub const fn from_pascals(pa: f64) -> Self {
        Self(pa)
    }

    /// Pressure from kilopascals.
    #[inline]
    pub fn from_kilopascals(kpa: f64) -> Self {
        Self(kpa * PA_PER_KPA)
    }

    /// Value in pascals.
    #[inline]
    pub fn pascals(self) -> f64 {
        self.0
    }

    /// Value in kilopascals.
    #[inline]
    pub fn kilopascals(self) -> f64 {
        self.0 / PA_PER_KPA
    }

    /// Value in standard atmospheres.
    #[inline]
    pub fn atmospheres(self) -> f64 {
        self.0 / PA_PER_ATM
    }
}

impl Diffusivity {
    /// Diffusivity from m²/s.
    #[inline]
    pub const fn from_m2_per_s(d: f64) -> Self {
        Self(d)
    }

    /// Diffusivity from cm²/s.
    #[inline]
    pub fn from_cm2_per_s(d: f64) -> Self {
        Self(d * M2_PER_CM2)
    }

    /// Value in m²/s.
    #[inline]
    pub fn m2_per_s(self) -> f64 {
        self.0
    }

    /// Value in cm²/s.
    #[inline]
    pub fn cm2_per_s(self) -> f64 {
        self.0 / M2_PER_CM2
    }
}

impl Viscosity {
    /// Viscosity from Pa·s.
    #[inline]
    pub const fn from_pascal_seconds(mu: f64) -> Self {
        Self(mu)
    }

    /// Viscosity from poise (g/cm/s).
    #[inline]
    pub fn from_poise(mu: f64) -> Self {
        Self(mu * PA_S_PER_POISE)
    }

    /// Value in Pa·s.
    #[inline]
    pub fn pascal_seconds(self) -> f64 {
        self.0
    }

    /// Value in poise.
    #[inline]
    pub fn poise(self) -> f64 {
        self.0 / PA_S_PER_POISE
    }
}

impl MolarMass {
    /// Molar mass from kg/mol.
    #[inline]
    pub const fn from_kilograms_per_mole(m: f64) -> Self {
        Self(m)
    }

    /// Molar mass from g/mol.
    #[inline]
    pub fn from_grams_per_mole(m: f64) -> Self {
        Self(m * KG_PER_G)
    }

    /// Value in kg/mol.
    #[inline]
    pub fn kilograms_per_mole(self) -> f64 {
        self.0
    }

    /// Value in g/mol.
    #[inline]
    pub fn grams_per_mole(self) -> f64 {
        self.0 / KG_PER_G
    }
}

impl Concentration {
    /// Concentration from mol/m³.
    #[inline]
    pub const fn from_mol_per_m3(c: f64) -> Self {
        Self(c)
    }

    /// Concentration from mol/L.
    #[inline]
    pub fn from_mol_per_liter(c: f64) -> Self {
        Self(c * MOL_M3_PER_MOL_L)
    }

    /// Value in mol/m³.
    #[inline]
    pub fn mol_per_m3(self) -> f64 {
        self.0
    }

    /// Value in mol/L.
    #[inline]
    pub fn mol_per_liter(self) -> f64 {
        self.0 / MOL_M3_PER_MOL_L
    }
}
