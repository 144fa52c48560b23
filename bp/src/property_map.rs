//! Dense stores for messages (one per edge) and beliefs (one per vertex).

use crate::graph::BpGraph;

macro_rules! dense_map {
    ($name:ident, $elem:ident, $count:ident, $index:ident, $what:literal) => {
        #[doc = concat!("One value per ", $what, ", stored densely by ", $what, " index.")]
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        pub struct $name<T> {
            values: Vec<T>,
        }

        impl<T> $name<T> {
            pub fn new<G: BpGraph>(graph: &G) -> Self
            where
                T: Default,
            {
                Self::from_fn(graph, |_| T::default())
            }
            pub fn from_elem<G: BpGraph>(graph: &G, elem: T) -> Self
            where
                T: Clone,
            {
                Self {
                    values: vec![elem; graph.$count()],
                }
            }
            /// Build the map by calling `f` on every index.
            pub fn from_fn<G: BpGraph>(graph: &G, f: impl FnMut(usize) -> T) -> Self {
                Self {
                    values: (0..graph.$count()).map(f).collect(),
                }
            }
            pub fn from_vec(values: Vec<T>) -> Self {
                Self { values }
            }
            pub fn len(&self) -> usize {
                self.values.len()
            }
            pub fn is_empty(&self) -> bool {
                self.values.is_empty()
            }
            pub fn at<G: BpGraph>(&self, graph: &G, key: G::$elem) -> &T {
                &self.values[graph.$index(key)]
            }
            pub fn at_mut<G: BpGraph>(&mut self, graph: &G, key: G::$elem) -> &mut T {
                &mut self.values[graph.$index(key)]
            }
            pub fn iter(&self) -> std::slice::Iter<'_, T> {
                self.values.iter()
            }
            pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
                self.values.iter_mut()
            }
        }

        impl<T> std::ops::Index<usize> for $name<T> {
            type Output = T;
            fn index(&self, index: usize) -> &T {
                &self.values[index]
            }
        }

        impl<T> std::ops::IndexMut<usize> for $name<T> {
            fn index_mut(&mut self, index: usize) -> &mut T {
                &mut self.values[index]
            }
        }

        impl<'a, T> IntoIterator for &'a $name<T> {
            type Item = &'a T;
            type IntoIter = std::slice::Iter<'a, T>;
            fn into_iter(self) -> Self::IntoIter {
                self.values.iter()
            }
        }
    };
}

dense_map!(EdgeMap, Edge, num_edges, edge_index, "edge");
dense_map!(VertexMap, Vertex, num_vertices, vertex_index, "vertex");
