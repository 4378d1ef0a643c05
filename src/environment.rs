use std::rc::Rc;

#[derive(Debug)]
struct Binding {
    name: String,
    value: i64,
    next: Option<Rc<Binding>>,
}

/// The bindings in scope at some point of evaluation, innermost first.
///
/// Extending an environment returns a new one that shares its tail with the
/// original, so the original stays valid and unchanged. A name may be bound
/// more than once; lookups see the most recent binding.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    head: Option<Rc<Binding>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new environment with `name` bound to `value` in front of all existing bindings.
    pub fn extend(&self, name: impl Into<String>, value: i64) -> Self {
        Self {
            head: Some(Rc::new(Binding {
                name: name.into(),
                value,
                next: self.head.clone(),
            })),
        }
    }

    /// The value of the innermost binding for `name`.
    pub fn lookup(&self, name: &str) -> Option<i64> {
        self.iter()
            .find(|(bound, _)| *bound == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

/// Builds an environment whose first item is the innermost binding.
impl<S: Into<String>> FromIterator<(S, i64)> for Environment {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        let bindings: Vec<(S, i64)> = iter.into_iter().collect();
        bindings
            .into_iter()
            .rev()
            .fold(Self::new(), |env, (name, value)| env.extend(name, value))
    }
}

pub struct Iter<'a> {
    next: Option<&'a Binding>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, i64);

    fn next(&mut self) -> Option<Self::Item> {
        let binding = self.next?;
        self.next = binding.next.as_deref();
        Some((binding.name.as_str(), binding.value))
    }
}

impl Drop for Environment {
    // Unlink uniquely owned bindings one at a time so long chains don't recurse on drop.
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(binding) = next {
            match Rc::try_unwrap(binding) {
                Ok(mut binding) => next = binding.next.take(),
                Err(_) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn lookup_in_empty_environment() {
        let env = Environment::new();
        assert!(env.is_empty());
        assert_eq!(env.lookup("x"), None);
    }

    #[test]
    fn lookup_innermost_binding() {
        let env = Environment::new().extend("x", 1).extend("y", 2).extend("x", 3);
        assert_eq!(env.lookup("x"), Some(3));
        assert_eq!(env.lookup("y"), Some(2));
        assert_eq!(env.len(), 3);
    }

    #[test]
    fn extend_leaves_original_untouched() {
        let outer = Environment::new().extend("x", 1);
        let inner = outer.extend("x", 2);
        let sibling = outer.extend("y", 5);

        assert_eq!(inner.lookup("x"), Some(2));
        assert_eq!(outer.lookup("x"), Some(1));
        assert_eq!(sibling.lookup("x"), Some(1));
        assert_eq!(inner.lookup("y"), None);
        assert_eq!(outer.len(), 1);
    }

    #[test]
    fn shadowed_bindings_are_kept() {
        let env = Environment::new().extend("x", 1).extend("x", 2);
        assert_eq!(env.iter().collect::<Vec<_>>(), vec![("x", 2), ("x", 1)]);
    }

    #[test]
    fn collect_puts_first_item_innermost() {
        let env: Environment = [("x", 99), ("x", 1), ("z", 7)].into_iter().collect();
        assert_eq!(env.lookup("x"), Some(99));
        assert_eq!(
            env.iter().collect::<Vec<_>>(),
            vec![("x", 99), ("x", 1), ("z", 7)]
        );
    }

    #[test]
    fn drop_long_chain() {
        let mut env = Environment::new();
        for value in 0..200_000 {
            env = env.extend("n", value);
        }
        assert_eq!(env.lookup("n"), Some(199_999));
        drop(env);
    }
}
