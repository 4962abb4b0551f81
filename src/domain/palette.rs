// Colour palettes for chart series and KPI card accents
use super::role::Role;

pub const PRIMARY: [&str; 5] = ["#00B4D8", "#0077B6", "#023E8A", "#03045E", "#90E0EF"];

pub const VIBRANT: [&str; 8] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E2",
];

pub const DEFAULT: [&str; 8] = [
    "#118DFF", "#12239E", "#E66C37", "#6B007B", "#E044A7", "#744EC2", "#D9B300", "#D64550",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Primary,
    Vibrant,
    Default,
}

impl Palette {
    pub fn colors(&self) -> &'static [&'static str] {
        match self {
            Palette::Primary => &PRIMARY,
            Palette::Vibrant => &VIBRANT,
            Palette::Default => &DEFAULT,
        }
    }

    /// Colour for the n-th slice, wrapping around the palette.
    pub fn color(&self, index: usize) -> &'static str {
        let colors = self.colors();
        colors[index % colors.len()]
    }
}

/// Accent gradients for the four headline KPI cards of a role.
pub fn role_gradients(role: Role) -> [&'static str; 4] {
    match role {
        Role::Cxo => [
            "from-blue-600 to-indigo-600",
            "from-emerald-600 to-teal-600",
            "from-orange-600 to-amber-600",
            "from-purple-600 to-pink-600",
        ],
        Role::PlantHead => [
            "from-teal-600 to-cyan-600",
            "from-blue-600 to-sky-600",
            "from-orange-600 to-red-600",
            "from-indigo-600 to-purple-600",
        ],
        Role::EnergyManager => [
            "from-green-600 to-emerald-600",
            "from-yellow-600 to-orange-600",
            "from-lime-600 to-green-600",
            "from-teal-600 to-emerald-600",
        ],
        Role::Sales => [
            "from-pink-600 to-rose-600",
            "from-purple-600 to-fuchsia-600",
            "from-orange-600 to-pink-600",
            "from-blue-600 to-purple-600",
        ],
    }
}
