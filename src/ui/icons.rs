pub struct Icons;

impl Icons {
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const PERSON: &str = "👤";
    pub const QUESTION: &str = "❓";
    pub const REPLY: &str = "💬";
    pub const EYE: &str = "👀";
    pub const HEART: &str = "❤️";
    pub const STAR: &str = "⭐";
}
