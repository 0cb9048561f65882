//! End-to-end behaviour of a small AC circuit model

use acnet_core::units::{CURRENT, VOLTAGE};
use acnet_core::{
    decompose, BranchId, Circuit, CircuitError, ComponentKind, Control, ControlVariable, Henries,
    Ohms,
};
use num_complex::Complex64;
use std::f64::consts::PI;

const EPS: f64 = 1e-9;

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn close(a: Complex64, b: Complex64) -> bool {
    (a - b).norm() < EPS
}

/// Four nodes, six branches, node 0 grounded.
fn sample_circuit() -> (Circuit, Vec<BranchId>) {
    let mut circuit = Circuit::new();
    let nodes: Vec<_> = (0..4).map(|_| circuit.add_node()).collect();
    circuit.node_mut(nodes[0]).unwrap().voltage = Some(c(0.0, 0.0));

    let mut branches = Vec::new();
    let mut branch = |circuit: &mut Circuit, l: usize, r: usize| {
        let id = circuit.add_branch(nodes[l], nodes[r]).unwrap();
        branches.push(id);
        id
    };

    let b = branch(&mut circuit, 0, 1);
    circuit.add_voltage_source(b, c(100.0, 0.0)).unwrap();
    let b = branch(&mut circuit, 0, 2);
    circuit.add_resistor(b, Ohms(1.0)).unwrap();
    circuit.add_voltage_source(b, c(90.0, 0.0)).unwrap();
    let b = branch(&mut circuit, 0, 3);
    circuit.add_resistor(b, Ohms(1.0)).unwrap();
    circuit.add_current_source(b, c(20.0, 0.0)).unwrap();
    let b = branch(&mut circuit, 1, 2);
    circuit.add_voltage_source(b, c(110.0, 0.0)).unwrap();
    let b = branch(&mut circuit, 1, 3);
    circuit.add_resistor(b, Ohms(2.0)).unwrap();
    let b = branch(&mut circuit, 2, 3);
    circuit.add_resistor(b, Ohms(2.0)).unwrap();

    (circuit, branches)
}

#[test]
fn decompose_keeps_magnitude_over_full_turn() {
    for step in -179..=179 {
        let theta = (step as f64).to_radians();
        let (magnitude, phase) = decompose(Complex64::from_polar(2.5, theta));
        assert!((magnitude - 2.5).abs() < EPS, "step {step}");
        assert!((phase - step as f64).abs() < 1e-6, "step {step}");
    }
    // the negative real axis folds onto a signed magnitude
    assert_eq!(decompose(c(-2.5, 0.0)), (-2.5, 0.0));
}

#[test]
fn unit_scaling_examples() {
    let (v, unit) = VOLTAGE.scale(0.001);
    assert!((v - 1.0).abs() < EPS);
    assert_eq!(unit, "mV");

    let (v, unit) = VOLTAGE.scale(1500.0);
    assert!((v - 1.5).abs() < EPS);
    assert_eq!(unit, "kV");

    assert_eq!(CURRENT.scale(0.0), (0.0, "μA"));
}

#[test]
fn sample_circuit_branch_quantities() {
    let (circuit, branches) = sample_circuit();
    assert_eq!(circuit.node_count(), 4);
    assert_eq!(circuit.branch_count(), 6);
    assert_eq!(circuit.component_count(), 8);

    // R=1 in series with a voltage source
    let z = circuit.branch_impedance(branches[1]).unwrap().unwrap();
    assert!(close(z, c(1.0, 0.0)));
    let y = circuit.branch_admittance(branches[1]).unwrap().unwrap();
    assert!(close(y, c(1.0, 0.0)));

    // Ideal source only: zero impedance, admittance reported as 0
    assert_eq!(
        circuit.branch_admittance(branches[0]).unwrap(),
        Some(c(0.0, 0.0))
    );

    let y = circuit.branch_admittance(branches[4]).unwrap().unwrap();
    assert!(close(y, c(0.5, 0.0)));

    assert!(!circuit.validate().has_issues());
}

#[test]
fn registry_keys_follow_registration_order() {
    let (circuit, _) = sample_circuit();
    assert_eq!(
        circuit.registry().keys(),
        vec!["I1", "R1", "R2", "R3", "R4", "U1", "U2", "U3"]
    );
    let r2 = circuit.lookup("R2").unwrap();
    assert_eq!(r2.number(), Some(2));
    assert_eq!(r2.branch(), BranchId::new(2));
    assert!(matches!(circuit.lookup("R9"), Err(CircuitError::NotFound(_))));
}

#[test]
fn dependent_source_follows_controller_updates() {
    let (mut circuit, branches) = sample_circuit();
    let r1 = circuit.lookup("R1").unwrap().id();
    let e1 = circuit
        .add_dependent_voltage_source(
            branches[4],
            Control::new(r1, ControlVariable::Current, 2.0),
        )
        .unwrap();

    assert_eq!(circuit.voltage_of(e1).unwrap(), None);
    circuit
        .component_mut(r1)
        .unwrap()
        .set_current(c(3.0, 0.0))
        .unwrap();
    assert_eq!(circuit.voltage_of(e1).unwrap(), Some(c(6.0, 0.0)));

    // A chain multiplies gains
    let f1 = circuit
        .add_dependent_current_source(
            branches[5],
            Control::new(e1, ControlVariable::Voltage, 0.5),
        )
        .unwrap();
    assert_eq!(circuit.current_of(f1).unwrap(), Some(c(3.0, 0.0)));

    // Close the loop: reading now reports the cycle instead of recursing
    let g1 = circuit
        .add_dependent_voltage_source(
            branches[5],
            Control::new(f1, ControlVariable::Current, 1.0),
        )
        .unwrap();
    circuit.bind_controller(f1, g1).unwrap();
    assert_eq!(circuit.component(f1).unwrap().key(), "I2");
    assert!(matches!(
        circuit.voltage_of(g1),
        Err(CircuitError::ControlCycle(_))
    ));
    assert!(circuit.validate().has_errors());
}

#[test]
fn reactance_tracks_frequency_changes() {
    let mut circuit = Circuit::new();
    let n0 = circuit.add_node();
    let n1 = circuit.add_node();
    let b = circuit.add_branch(n0, n1).unwrap();
    let l1 = circuit.add_inductor(b, Henries(1e-3)).unwrap();

    let at_default = circuit.impedance_of(l1).unwrap().unwrap();
    assert!(close(at_default, c(0.0, 2.0 * PI * 1000.0 * 1e-3)));

    circuit.set_frequency(2000.0).unwrap();
    let at_2k = circuit.impedance_of(l1).unwrap().unwrap();
    assert!(close(at_2k, c(0.0, 2.0 * PI * 2000.0 * 1e-3)));
    assert!(close(
        circuit.branch_impedance(b).unwrap().unwrap(),
        at_2k
    ));
}

#[test]
fn unset_capacitor_fails_branch_reads() {
    let mut circuit = Circuit::new();
    let n0 = circuit.add_node();
    let n1 = circuit.add_node();
    let b = circuit.add_branch(n0, n1).unwrap();
    circuit.add_resistor(b, Ohms(5.0)).unwrap();
    let c1 = circuit
        .add_component(b, ComponentKind::capacitor(None))
        .unwrap();

    assert!(matches!(
        circuit.branch_impedance(b),
        Err(CircuitError::Domain(_))
    ));
    assert!(circuit.branch_admittance(b).is_err());
    assert!(circuit.admittance_of(c1).is_err());
}
