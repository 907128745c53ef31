use abm_graph::{AttrValue, Graph, GraphError, PathStep, VertexId};

#[test]
fn auto_ids_are_distinct_and_strictly_increasing() {
    let mut g = Graph::new(true);
    let ids: Vec<_> = (0..5).map(|_| g.add_vertex()).collect();
    for w in ids.windows(2) {
        assert!(w[0] < w[1]);
    }
    assert_eq!(g.vertex_count(), 5);
}

#[test]
fn explicit_duplicate_id_is_rejected() {
    let mut g = Graph::new(true);
    g.add_vertex_with_id(VertexId(7)).unwrap();
    assert_eq!(
        g.add_vertex_with_id(VertexId(7)),
        Err(GraphError::DuplicateVertex(VertexId(7)))
    );
    // The first vertex is untouched.
    assert_eq!(g.vertex_count(), 1);
}

#[test]
fn auto_ids_skip_past_explicit_ids() {
    let mut g = Graph::new(true);
    g.add_vertex_with_id(VertexId(10)).unwrap();
    let next = g.add_vertex();
    assert!(next > VertexId(10));
}

#[test]
fn connect_registers_edge_in_master_and_adjacency_lists() {
    let mut g = Graph::new(true);
    let a = g.add_vertex();
    let b = g.add_vertex();
    let e = g.connect_vertices(a, b, "track", 1.0);

    assert_eq!(g.edges().filter(|edge| edge.id == e).count(), 1);
    let va = g.vertex(a).unwrap();
    let vb = g.vertex(b).unwrap();
    assert_eq!(va.out_edges, vec![e]);
    assert!(va.in_edges.is_empty());
    assert_eq!(vb.in_edges, vec![e]);
    assert!(vb.out_edges.is_empty());
}

#[test]
fn undirected_edge_is_registered_in_both_directions() {
    let mut g = Graph::new(false);
    let a = g.add_vertex();
    let b = g.add_vertex();
    let e = g.connect_vertices(a, b, "", 0.0);

    let va = g.vertex(a).unwrap();
    let vb = g.vertex(b).unwrap();
    assert_eq!(va.out_edges, vec![e]);
    assert_eq!(va.in_edges, vec![e]);
    assert_eq!(vb.out_edges, vec![e]);
    assert_eq!(vb.in_edges, vec![e]);
    // Still exactly one edge object.
    assert_eq!(g.edge_count(), 1);
}

#[test]
fn connect_creates_missing_endpoints() {
    let mut g = Graph::new(true);
    g.connect_vertices(VertexId(3), VertexId(9), "", 0.0);
    assert!(g.vertex(VertexId(3)).is_some());
    assert!(g.vertex(VertexId(9)).is_some());
}

#[test]
fn parallel_edges_are_permitted() {
    let mut g = Graph::new(true);
    let a = g.add_vertex();
    let b = g.add_vertex();
    let e1 = g.connect_vertices(a, b, "x", 1.0);
    let e2 = g.connect_vertices(a, b, "x", 2.0);
    assert_ne!(e1, e2);
    assert_eq!(g.edge_count(), 2);
    assert_eq!(g.vertex(a).unwrap().out_edges, vec![e1, e2]);
}

#[test]
fn edge_attrs_round_trip() {
    let mut g = Graph::new(true);
    let a = g.add_vertex();
    let b = g.add_vertex();
    let e = g.connect_vertices(a, b, "", 0.0);
    assert!(g.set_edge_attr(e, "runlink", AttrValue::Float(120.0)));
    assert_eq!(
        g.edge(e).unwrap().attrs.get("runlink").and_then(|v| v.as_f64()),
        Some(120.0)
    );
}

#[test]
fn delete_vertex_removes_incident_edges_everywhere() {
    let mut g = Graph::new(true);
    let a = g.add_vertex();
    let b = g.add_vertex();
    let c = g.add_vertex();
    g.connect_vertices(a, b, "", 0.0);
    g.connect_vertices(b, c, "", 0.0);
    let keep = g.connect_vertices(a, c, "", 0.0);

    g.delete_vertex(b).unwrap();

    assert!(g.vertex(b).is_none());
    assert_eq!(g.edge_count(), 1);
    let va = g.vertex(a).unwrap();
    let vc = g.vertex(c).unwrap();
    assert_eq!(va.out_edges, vec![keep]);
    assert_eq!(vc.in_edges, vec![keep]);
    // No dangling edge ids anywhere.
    for v in g.vertices() {
        for eid in v.out_edges.iter().chain(v.in_edges.iter()) {
            assert!(g.edge(*eid).is_some());
        }
    }
}

#[test]
fn delete_unknown_vertex_fails() {
    let mut g = Graph::new(true);
    assert_eq!(
        g.delete_vertex(VertexId(1)),
        Err(GraphError::VertexNotFound(VertexId(1)))
    );
}

#[test]
fn flatten_chain_yields_one_path() {
    let mut g = Graph::new(true);
    let a = g.add_vertex();
    let b = g.add_vertex();
    let c = g.add_vertex();
    g.connect_vertices(a, b, "", 0.0);
    g.connect_vertices(b, c, "", 0.0);

    let steps = g.flatten();
    assert_eq!(
        steps,
        vec![
            PathStep::Vertex(a),
            PathStep::Vertex(b),
            PathStep::Vertex(c),
            PathStep::Break,
        ]
    );
}

#[test]
fn flatten_terminates_on_cycles() {
    let mut g = Graph::new(true);
    let a = g.add_vertex();
    let b = g.add_vertex();
    g.connect_vertices(a, b, "", 0.0);
    g.connect_vertices(b, a, "", 0.0);

    let steps = g.flatten();
    assert_eq!(
        steps,
        vec![
            PathStep::Vertex(a),
            PathStep::Vertex(b),
            PathStep::Vertex(a),
            PathStep::Break,
        ]
    );
}

#[test]
fn labelled_flatten_does_not_cross_networks() {
    let mut g = Graph::new(true);
    let a = g.add_vertex();
    let b = g.add_vertex();
    let c = g.add_vertex();
    g.connect_vertices(a, b, "red", 0.0);
    g.connect_vertices(a, c, "blue", 0.0);

    let steps = g.flatten_labelled("red");
    assert_eq!(
        steps,
        vec![
            PathStep::Vertex(a),
            PathStep::Vertex(b),
            PathStep::Break,
            PathStep::Vertex(c),
            PathStep::Break,
        ]
    );
}

#[test]
fn flatten_is_repeatable() {
    let mut g = Graph::new(true);
    let a = g.add_vertex();
    let b = g.add_vertex();
    g.connect_vertices(a, b, "", 0.0);
    let first = g.flatten();
    let second = g.flatten();
    assert_eq!(first, second);
}

#[test]
fn dirty_flag_tracks_topology_changes() {
    let mut g = Graph::new(true);
    assert!(!g.is_dirty());
    let a = g.add_vertex();
    assert!(g.is_dirty());
    g.clear_dirty();
    let b = g.add_vertex();
    g.clear_dirty();
    g.connect_vertices(a, b, "", 0.0);
    assert!(g.is_dirty());
}
