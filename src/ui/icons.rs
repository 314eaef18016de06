/// Glyphs prefixed to console lines.
pub struct Icons;

impl Icons {
    pub const DATABASE: &str = "🗄️";
    pub const GEAR: &str = "⚙️";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const SKIP: &str = "⏭️";
    pub const STATS: &str = "📊";
    pub const FILE: &str = "📄";
    pub const PLUS: &str = "➕";
}
