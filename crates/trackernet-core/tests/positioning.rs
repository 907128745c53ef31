use abm_core::{AgentId, Vec3};
use serde_json::json;
use trackernet_core::feed::parse_csv;
use trackernet_core::{
    NetworkTopology, PositionError, TrackernetConfig, TrackernetModel, TRAIN_CLASS,
};

// Three stations on a west-east line, 100 units apart, 100s scheduled
// run time per hop, so en-route trains move at 1 unit per second.
// Direction 0 runs AAA -> BBB -> CCC, direction 1 runs back.
fn test_model() -> TrackernetModel {
    let stations = parse_csv(
        "#code,lon,lat,name\n\
         AAA,0.000,0.0,Alpha\n\
         BBB,0.001,0.0,Beta\n\
         CCC,0.002,0.0,Gamma\n",
    );
    let topology: NetworkTopology = serde_json::from_value(json!({
        "B": {
            "0": [
                {"o": "AAA", "d": "BBB", "r": 100.0},
                {"o": "BBB", "d": "CCC", "r": 100.0},
            ],
            "1": [
                {"o": "CCC", "d": "BBB", "r": 100.0},
                {"o": "BBB", "d": "AAA", "r": 100.0},
            ],
        }
    }))
    .unwrap();

    let mut model = TrackernetModel::new(TrackernetConfig::default());
    model.setup(&stations, &topology, |lon, lat| {
        Vec3::new(lon * 100_000.0, lat * 100_000.0, 0.0)
    });
    model
}

fn train(model: &mut TrackernetModel, name: &str) -> AgentId {
    let id = model.core_mut().create_agents(1, TRAIN_CLASS)[0];
    model.core_mut().agent_mut(id).unwrap().name = name.to_string();
    id
}

fn position_of(model: &TrackernetModel, id: AgentId) -> Vec3 {
    model.core().agent(id).unwrap().position
}

fn assert_near(p: Vec3, x: f64, y: f64) {
    assert!((p.x - x).abs() < 1e-6, "x = {}, wanted {}", p.x, x);
    assert!((p.y - y).abs() < 1e-6, "y = {}, wanted {}", p.y, y);
}

#[test]
fn at_platform_snaps_to_station() {
    let mut model = test_model();
    let id = train(&mut model, "B_1_1");
    model.position_agent(id, "B", 0.0, "BBB", 0).unwrap();

    assert_near(position_of(&model, id), 100.0, 0.0);
    let state = model.train_state(id).unwrap();
    assert_eq!(state.from_node, state.to_node);
    assert_eq!(state.velocity, 5.0);
}

#[test]
fn en_route_interpolates_backward_from_station() {
    let mut model = test_model();
    let id = train(&mut model, "B_1_1");
    // Half the scheduled run time out of BBB puts it mid-link.
    model.position_agent(id, "B", 50.0, "BBB", 0).unwrap();

    assert_near(position_of(&model, id), 50.0, 0.0);
    let state = model.train_state(id).unwrap();
    assert!((state.velocity - 1.0).abs() < 1e-9);
}

#[test]
fn long_tts_clamps_to_link_origin() {
    let mut model = test_model();
    let id = train(&mut model, "B_1_1");
    model.position_agent(id, "B", 150.0, "BBB", 0).unwrap();
    assert_near(position_of(&model, id), 0.0, 0.0);
}

#[test]
fn direction_selects_among_inbound_links() {
    let mut model = test_model();
    let id = train(&mut model, "B_1_1");
    // BBB has inbound links from both sides; direction 1 means the train
    // is coming from CCC.
    model.position_agent(id, "B", 50.0, "BBB", 1).unwrap();
    assert_near(position_of(&model, id), 150.0, 0.0);
}

#[test]
fn single_inbound_link_overrides_direction() {
    let mut model = test_model();
    let id = train(&mut model, "B_1_1");
    // CCC's only inbound link carries direction 0; a direction 1 report
    // still lands on it.
    model.position_agent(id, "B", 50.0, "CCC", 1).unwrap();
    assert_near(position_of(&model, id), 150.0, 0.0);
}

#[test]
fn no_matching_link_is_an_error() {
    let mut model = test_model();
    let id = train(&mut model, "B_1_1");
    let err = model.position_agent(id, "B", 50.0, "BBB", 7).unwrap_err();
    assert!(matches!(err, PositionError::NoMatchingLink { .. }));
}

#[test]
fn unknown_station_is_an_error() {
    let mut model = test_model();
    let id = train(&mut model, "B_1_1");
    let err = model.position_agent(id, "B", 50.0, "ZZZ", 0).unwrap_err();
    assert_eq!(err, PositionError::StationNotFound("ZZZ".to_string()));
}

#[test]
fn advance_moves_en_route_train_by_velocity() {
    let mut model = test_model();
    let id = train(&mut model, "B_1_1");
    model.position_agent(id, "B", 50.0, "BBB", 0).unwrap();

    model.advance();
    assert_near(position_of(&model, id), 51.0, 0.0);
    model.advance();
    assert_near(position_of(&model, id), 52.0, 0.0);
}

#[test]
fn advance_retargets_on_arrival() {
    let mut model = test_model();
    let id = train(&mut model, "B_1_1");
    // Half a second from BBB: within one step's travel, so the next
    // advance counts as arrival and picks the onward link.
    model.position_agent(id, "B", 0.5, "BBB", 0).unwrap();

    model.advance();
    let ccc = model.core().get_agent("CCC").unwrap().id;
    let state = model.train_state(id).unwrap();
    assert_eq!(state.to_node, Some(ccc));

    // Next step heads toward CCC.
    let before = position_of(&model, id);
    model.advance();
    assert!(position_of(&model, id).x > before.x);
}

#[test]
fn advance_holds_at_end_of_line() {
    let mut model = test_model();
    let id = train(&mut model, "B_1_1");
    model.position_agent(id, "B", 0.0, "CCC", 0).unwrap();

    let ccc = model.core().get_agent("CCC").unwrap().id;
    for _ in 0..5 {
        model.advance();
    }
    assert_near(position_of(&model, id), 200.0, 0.0);
    assert_eq!(model.train_state(id).unwrap().to_node, Some(ccc));
}
