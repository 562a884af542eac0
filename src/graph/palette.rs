/// Fill colors, one per value kind
pub struct Palette {
    pub frame: &'static str,
    pub scalar: &'static str,
    pub singleton: &'static str,
    pub list: &'static str,  // Mutable sequences
    pub tuple: &'static str, // Immutable sequences
    pub dict: &'static str,
    pub set: &'static str,
    pub array: &'static str,
}

pub const DEFAULT_PALETTE: Palette = Palette {
    frame: "#ffffb3",     // Pale yellow
    scalar: "#80b1d3",    // Blue
    singleton: "#b3de69", // Green
    list: "#fb8072",      // Red
    tuple: "#fdb462",     // Orange
    dict: "#bebada",      // Purple
    set: "#8dd3c7",       // Teal
    array: "#fccde5",     // Pink
};
