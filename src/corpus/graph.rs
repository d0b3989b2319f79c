//! Character co-occurrence graph for one document.
//!
//! Nodes are the most frequent people of the document. Two people are joined
//! when they appear in the same paragraph; the edge accumulates both of their
//! paragraph counts. [`CharacterGraph::normalize`] turns raw edge totals into
//! relative strengths.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::corpus::document::{BookId, Document};
use crate::corpus::words::Category;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphNode {
    pub name: String,
    pub weight: usize,
    pub degree: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: f64,
    pub thickness: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CharacterGraph {
    pub book: BookId,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl CharacterGraph {
    /// Build the raw graph from the `top` most frequent people of `doc`.
    pub fn build(doc: &Document, top: usize) -> Self {
        let ranked = doc.words().most_common(Category::People, top);
        let weights: BTreeMap<&str, usize> = ranked.iter().copied().collect();

        let mut edges: BTreeMap<(String, String), usize> = BTreeMap::new();
        for paragraph in doc.paragraphs() {
            let present: Vec<(&str, usize)> = paragraph
                .words()
                .get(Category::People)
                .iter()
                .filter(|(name, _)| weights.contains_key(name.as_str()))
                .map(|(name, &count)| (name.as_str(), count))
                .collect();
            for (i, &(a, ca)) in present.iter().enumerate() {
                for &(b, cb) in &present[i + 1..] {
                    *edges.entry((a.to_string(), b.to_string())).or_insert(0) += ca + cb;
                }
            }
        }

        let mut degree: BTreeMap<&str, usize> = BTreeMap::new();
        for (a, b) in edges.keys() {
            *degree.entry(a.as_str()).or_insert(0) += 1;
            *degree.entry(b.as_str()).or_insert(0) += 1;
        }

        let nodes = ranked
            .iter()
            .map(|&(name, weight)| GraphNode {
                name: name.to_string(),
                weight,
                degree: degree.get(name).copied().unwrap_or(0),
            })
            .collect();

        let edges = edges
            .into_iter()
            .map(|((source, target), w)| GraphEdge {
                source,
                target,
                weight: w as f64,
                thickness: 1.0,
            })
            .collect();

        Self {
            book: doc.id(),
            nodes,
            edges,
        }
    }

    /// Rescale each edge by its endpoints' weights: with `p = edge / node`,
    /// the strength is `max(p1 * p2^0.8, p2 * p1^0.8)` and the drawn thickness
    /// its square root.
    pub fn normalize(&mut self) {
        let weights: BTreeMap<&str, usize> =
            self.nodes.iter().map(|n| (n.name.as_str(), n.weight)).collect();
        for edge in &mut self.edges {
            let w1 = weights.get(edge.source.as_str()).copied().unwrap_or(0);
            let w2 = weights.get(edge.target.as_str()).copied().unwrap_or(0);
            if w1 == 0 || w2 == 0 {
                edge.weight = 0.0;
                edge.thickness = 0.0;
                continue;
            }
            let p1 = edge.weight / w1 as f64;
            let p2 = edge.weight / w2 as f64;
            edge.weight = (p1 * p2.powf(0.8)).max(p2 * p1.powf(0.8));
            edge.thickness = edge.weight.sqrt();
        }
    }

    pub fn max_degree(&self) -> usize {
        self.nodes.iter().map(|n| n.degree).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> CharacterGraph {
        CharacterGraph {
            book: 1,
            nodes: vec![
                GraphNode { name: "Harry".into(), weight: 4, degree: 1 },
                GraphNode { name: "Ron".into(), weight: 2, degree: 1 },
            ],
            edges: vec![GraphEdge {
                source: "Harry".into(),
                target: "Ron".into(),
                weight: 2.0,
                thickness: 1.0,
            }],
        }
    }

    #[test]
    fn normalize_uses_relative_strength() {
        let mut g = graph();
        g.normalize();
        // p1 = 0.5, p2 = 1.0 -> max(0.5 * 1, 1 * 0.5^0.8)
        let expected = 0.5f64.powf(0.8);
        assert!((g.edges[0].weight - expected).abs() < 1e-12);
        assert!((g.edges[0].thickness - expected.sqrt()).abs() < 1e-12);
        assert_eq!(g.max_degree(), 1);
    }
}
