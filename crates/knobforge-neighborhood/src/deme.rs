//! Populations of instances sharing one layout.

use std::ops::Index;

use knobforge_core::{FieldLayout, Instance, Result};

/// A buffer of instances that neighborhood generation appends to.
///
/// The population owns the layout its instances are interpreted through.
pub trait Population {
    fn layout(&self) -> &FieldLayout;

    /// Instances in insertion order.
    fn instances(&self) -> &[Instance];

    /// Grows or shrinks the population to `n` instances. New slots hold
    /// zero-valued instances of the layout's shape.
    fn resize(&mut self, n: usize);

    /// Borrows the layout and the instances mutably at the same time.
    fn split_mut(&mut self) -> (&mut FieldLayout, &mut [Instance]);

    fn len(&self) -> usize {
        self.instances().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> std::slice::Iter<'_, Instance> {
        self.instances().iter()
    }
}

/// A population of instances over one [`FieldLayout`].
///
/// # Example
///
/// ```
/// use knobforge_core::{FieldLayout, Spec};
/// use knobforge_neighborhood::{Deme, Population};
///
/// let layout = FieldLayout::repeated(Spec::bit(), 4).unwrap();
/// let mut deme = Deme::new(layout);
/// deme.resize(3);
/// assert_eq!(deme.len(), 3);
/// assert!(deme.iter().all(|inst| inst.size() == 1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Deme {
    layout: FieldLayout,
    instances: Vec<Instance>,
}

impl Deme {
    /// Creates an empty deme over `layout`.
    pub fn new(layout: FieldLayout) -> Self {
        Self {
            layout,
            instances: Vec::new(),
        }
    }

    /// Appends `inst`.
    ///
    /// # Errors
    /// Returns [`KnobError::ShapeMismatch`](knobforge_core::KnobError::ShapeMismatch)
    /// if `inst` does not have the layout's shape.
    pub fn push(&mut self, inst: Instance) -> Result<()> {
        self.layout.check_instance(&inst)?;
        self.instances.push(inst);
        Ok(())
    }

    pub fn get(&self, idx: usize) -> Option<&Instance> {
        self.instances.get(idx)
    }

    pub fn layout_mut(&mut self) -> &mut FieldLayout {
        &mut self.layout
    }

    pub fn into_instances(self) -> Vec<Instance> {
        self.instances
    }
}

impl Population for Deme {
    fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    fn instances(&self) -> &[Instance] {
        &self.instances
    }

    fn resize(&mut self, n: usize) {
        let blank = self.layout.new_instance();
        self.instances.resize(n, blank);
    }

    fn split_mut(&mut self) -> (&mut FieldLayout, &mut [Instance]) {
        (&mut self.layout, &mut self.instances)
    }
}

impl Index<usize> for Deme {
    type Output = Instance;

    fn index(&self, idx: usize) -> &Instance {
        &self.instances[idx]
    }
}

impl<'a> IntoIterator for &'a Deme {
    type Item = &'a Instance;
    type IntoIter = std::slice::Iter<'a, Instance>;

    fn into_iter(self) -> Self::IntoIter {
        self.instances.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knobforge_core::{KnobError, Spec};

    #[test]
    fn test_resize_uses_layout_shape() {
        let layout =
            FieldLayout::from_specs(vec![Spec::disc(5), Spec::contin(1.0, 2)]).unwrap();
        let mut deme = Deme::new(layout);
        assert!(deme.is_empty());
        deme.resize(2);
        assert_eq!(deme.len(), 2);
        assert_eq!(deme[1].size(), 1);
        assert_eq!(deme[1].contin_len(), 1);
        deme.resize(1);
        assert_eq!(deme.len(), 1);
    }

    #[test]
    fn test_push_checks_shape() {
        let layout = FieldLayout::repeated(Spec::bit(), 3).unwrap();
        let mut deme = Deme::new(layout);
        assert!(deme.push(Instance::new(1, 0)).is_ok());
        assert!(matches!(
            deme.push(Instance::new(2, 0)),
            Err(KnobError::ShapeMismatch { actual_words: 2, .. })
        ));
        assert_eq!(deme.len(), 1);
        assert!(deme.get(1).is_none());
    }

    #[test]
    fn test_split_mut() {
        let layout = FieldLayout::repeated(Spec::contin(1.0, 2), 1).unwrap();
        let mut deme = Deme::new(layout);
        deme.resize(1);
        let (layout, instances) = deme.split_mut();
        layout.contin_spec_mut(0).compress();
        instances[0].contin_mut()[0] = 3.0;
        assert_eq!(deme.layout().contin()[0].space(), 0.5);
        assert_eq!((&deme).into_iter().next().unwrap().contin(), &[3.0]);
    }
}
