/// Semantic checks that serde defaults cannot express.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
