/// Prototype search errors.
#[derive(Debug, thiserror::Error)]
pub enum PrototypeError {
    #[error("concept {concept_index} has no members to seed the search")]
    EmptyConcept { concept_index: usize },

    #[error("initial population is empty")]
    EmptyPopulation,

    #[error("no mutation operators supplied")]
    NoMutations,

    #[error("fitness returned {actual} scores for {expected} elements")]
    FitnessCountMismatch { expected: usize, actual: usize },

    #[error("graph has no embedding for channel {channel}")]
    MissingEmbedding { channel: usize },
}
