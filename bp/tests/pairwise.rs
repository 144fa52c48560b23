mod common;

use bp::{
    run_belief_propagation, BpError, BpGraph, Config, DiGraph, Distribution, PairwiseBp,
    PairwiseModel,
};
use common::reciprocal_tree;
use itertools::Itertools;
use ndarray::{Array1, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

/// Random evidence on every vertex and random potentials on every reciprocal pair.
fn random_model(graph: &DiGraph, nc: usize) -> PairwiseModel {
    let mut model = PairwiseModel::new(graph, nc);
    for v in graph.vertices() {
        let evidence = Array1::<f64>::random((nc,), Uniform::new(0.1, 1.0));
        model
            .set_evidence(graph, v, Distribution::from_array(evidence).unwrap())
            .unwrap();
    }
    for e in graph.edges() {
        let (u, w) = (graph.source(e), graph.target(e));
        if u < w {
            let reverse = graph.reverse_edge(e).unwrap();
            let potential = Array2::<f64>::random((nc, nc), Uniform::new(0.1, 1.0));
            model
                .set_reciprocal_potential(graph, e, reverse, potential)
                .unwrap();
        }
    }
    model
}

/// Unnormalized joint probability of `x`, each undirected connection counted once.
fn joint(graph: &DiGraph, model: &PairwiseModel, x: &[usize]) -> f64 {
    let mut p: f64 = graph
        .vertices()
        .map(|v| model.evidence(graph, v).to_array()[x[v]])
        .product();
    for e in graph.edges() {
        let (u, w) = (graph.source(e), graph.target(e));
        if u < w || graph.reverse_edge(e).is_none() {
            p *= model.potential(graph, e)[(x[u], x[w])];
        }
    }
    p
}

fn assignments(n: usize, nc: usize) -> impl Iterator<Item = Vec<usize>> {
    (0..n).map(move |_| 0..nc).multi_cartesian_product()
}

fn brute_force_marginals(graph: &DiGraph, model: &PairwiseModel, nc: usize) -> Array2<f64> {
    let n = graph.num_vertices();
    let mut marginals = Array2::<f64>::zeros((n, nc));
    for x in assignments(n, nc) {
        let p = joint(graph, model, &x);
        for v in 0..n {
            marginals[(v, x[v])] += p;
        }
    }
    let total = marginals.row(0).sum();
    marginals / total
}

fn brute_force_map(graph: &DiGraph, model: &PairwiseModel, nc: usize) -> Vec<usize> {
    assignments(graph.num_vertices(), nc)
        .max_by(|x, y| joint(graph, model, x).total_cmp(&joint(graph, model, y)))
        .unwrap()
}

#[test]
fn sum_product_tree_marginals() {
    let nc = 3;
    for parents in [vec![0, 1, 2, 3], vec![0, 0, 0, 0], vec![0, 0, 1, 1, 2]] {
        let graph = reciprocal_tree(&parents);
        let model = random_model(&graph, nc);
        let out = run_belief_propagation(
            &graph,
            &mut PairwiseBp::sum_product(&model),
            &Config::no_progress(),
        )
        .unwrap();
        out.propagation.ensure_complete().unwrap();

        let expected = brute_force_marginals(&graph, &model, nc);
        for v in graph.vertices() {
            let belief = out.beliefs[v].to_array();
            let mut dif = &belief - &expected.row(v);
            dif.mapv_inplace(|x| x.abs());
            for d in dif.iter() {
                assert!(*d < 1e-9);
            }
        }
    }
}

#[test]
fn max_product_tree_map() {
    let nc = 2;
    for parents in [vec![0, 1, 2, 3, 4], vec![0, 0, 1, 2, 2]] {
        let graph = reciprocal_tree(&parents);
        let model = random_model(&graph, nc);
        let out = run_belief_propagation(
            &graph,
            &mut PairwiseBp::max_product(&model),
            &Config::no_progress(),
        )
        .unwrap();

        let map: Vec<usize> = out.beliefs.iter().map(|b| b.argmax().unwrap()).collect();
        assert_eq!(map, brute_force_map(&graph, &model, nc));
    }
}

#[test]
fn directed_chain_last_belief_is_marginal() {
    // A -> B -> C, beliefs accumulate forward only
    let nc = 4;
    let graph = DiGraph::from_edges(3, [(0, 1), (1, 2)]);
    let mut model = PairwiseModel::new(&graph, nc);
    for v in graph.vertices() {
        let evidence = Array1::<f64>::random((nc,), Uniform::new(0.1, 1.0));
        model
            .set_evidence(&graph, v, Distribution::from_array(evidence).unwrap())
            .unwrap();
    }
    for e in graph.edges() {
        let potential = Array2::<f64>::random((nc, nc), Uniform::new(0.1, 1.0));
        model.set_potential(&graph, e, potential).unwrap();
    }
    let out = run_belief_propagation(
        &graph,
        &mut PairwiseBp::sum_product(&model),
        &Config::no_progress(),
    )
    .unwrap();

    let expected = brute_force_marginals(&graph, &model, nc);
    let belief = out.beliefs[2].to_array();
    for (b, e) in belief.iter().zip(expected.row(2).iter()) {
        assert!((b - e).abs() < 1e-9);
    }
    // the root only sees its own evidence
    let root = out.beliefs[0].to_array();
    let evidence = model.evidence(&graph, 0).to_array();
    let evidence = &evidence / evidence.sum();
    for (b, e) in root.iter().zip(evidence.iter()) {
        assert!((b - e).abs() < 1e-12);
    }
}

#[test]
fn hard_evidence_propagates() {
    // A -- B with an equality potential: observing A fixes B
    let nc = 3;
    let mut graph = DiGraph::with_vertices(2);
    let (ab, ba) = graph.add_reciprocal_edge(0, 1);
    let mut model = PairwiseModel::new(&graph, nc);
    model
        .set_reciprocal_potential(&graph, ab, ba, Array2::eye(nc))
        .unwrap();
    model
        .set_evidence(&graph, 0, Distribution::new_constant(nc, 2))
        .unwrap();
    let out = run_belief_propagation(
        &graph,
        &mut PairwiseBp::sum_product(&model),
        &Config::no_progress(),
    )
    .unwrap();

    assert_eq!(out.beliefs[1].argmax(), Some(2));
    assert!((out.beliefs[1].to_array()[2] - 1.0).abs() < 1e-12);
    // nothing is known on B, hence the message to A is uniform
    assert!(out.messages[ba]
        .to_array()
        .iter()
        .all(|p| (p - 1.0 / 3.0).abs() < 1e-12));
}

#[test]
fn unresolved_messages_stay_uniform() {
    let nc = 2;
    let graph = DiGraph::from_edges(3, [(0, 1), (1, 2), (2, 0)]);
    let model = PairwiseModel::new(&graph, nc);
    let out = run_belief_propagation(
        &graph,
        &mut PairwiseBp::sum_product(&model),
        &Config::no_progress(),
    )
    .unwrap();
    assert!(out.messages.iter().all(|m| !m.is_full() && m.nc() == nc));
    assert_eq!(
        out.propagation.ensure_complete(),
        Err(BpError::Unresolved {
            n_unresolved: 3,
            n_edges: 3
        })
    );
}

#[test]
fn model_checks() {
    let graph = reciprocal_tree(&[0]);
    let mut model = PairwiseModel::new(&graph, 2);
    assert_eq!(
        model.set_evidence(&graph, 0, Distribution::new(3)),
        Err(BpError::WrongDistributionNc(3, 2))
    );
    assert_eq!(
        model.set_potential(&graph, 0, Array2::ones((2, 3))),
        Err(BpError::WrongPotentialShape {
            got: (2, 3),
            expected: (2, 2)
        })
    );
    assert!(matches!(
        model.set_potential(&graph, 0, Array2::from_elem((2, 2), -1.0)),
        Err(BpError::InvalidDistribution(_))
    ));
    model.set_potential(&graph, 0, Array2::eye(2)).unwrap();
    model.drop_evidence(&graph, 1);
    assert!(!model.evidence(&graph, 1).is_full());
}

#[test]
fn distribution_basics() {
    assert!(Distribution::from_array(Array1::zeros(0)).is_err());
    assert!(Distribution::from_array(Array1::zeros(3)).is_err());
    assert!(Distribution::from_array(Array1::from(vec![0.5, f64::NAN])).is_err());

    let mut d = Distribution::from_array(Array1::from(vec![1.0, 3.0])).unwrap();
    d.normalize();
    assert_eq!(d.value().unwrap().to_vec(), vec![0.25, 0.75]);
    assert_eq!(d.argmax(), Some(1));

    let mut u = d.as_uniform();
    assert_eq!(u.value(), None);
    assert_eq!(u.to_array().to_vec(), vec![0.5, 0.5]);
    u.multiply([&d, &Distribution::new(2)].into_iter()).unwrap();
    assert_eq!(u.value().unwrap().to_vec(), vec![0.25, 0.75]);
    assert_eq!(
        u.multiply(std::iter::once(&Distribution::new(5))),
        Err(BpError::WrongDistributionNc(5, 2))
    );
}
