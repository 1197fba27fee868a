use uuid::Uuid;

/// Source of fresh order identifiers
pub trait OrderIdSource: Send + Sync {
    fn next_id(&self) -> Uuid;
}

/// Random v4 identifiers; collisions are not a practical concern.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOrderIds;

impl OrderIdSource for RandomOrderIds {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}
