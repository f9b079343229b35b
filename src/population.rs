/// The candidate pool an [`IterationController`](crate::optimizers::rvea::IterationController) evolves.
///
/// The controller never looks inside a candidate: it only asks for their
/// objective vectors, hands back survivor indices and moves offspring from
/// [`mate`](Population::mate) to [`add`](Population::add).
pub trait Population {
    type Individual;

    /// Number of candidates currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn num_of_objectives(&self) -> usize;

    /// Fills the population with `pop_size` freshly sampled, evaluated candidates.
    fn create_new_individuals(&mut self, pop_size: usize);

    /// Produces evaluated offspring from the current candidates.
    fn mate(&mut self) -> Vec<Self::Individual>;

    fn add(&mut self, offspring: Vec<Self::Individual>);

    fn individual(&self, index: usize) -> Option<&Self::Individual>;

    /// Keeps only the candidates at `selected`, in that order.
    fn keep(&mut self, selected: &[usize]);

    /// Objective vectors, one per candidate, in candidate order.
    fn objectives(&self) -> &[Vec<f64>];
}
