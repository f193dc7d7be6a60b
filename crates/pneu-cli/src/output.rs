//! Output formatting module

use pneu_app::app::{ImportSummary, VerificationOutcome};
use pneu_domain::model::{Alert, AlertKind, VehicleBaseline, VerificationRecord, VerificationStatus};
use pneu_types::{OutputFormat, Plate, Result, TireObservation};

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn key_text(tire: &TireObservation) -> String {
    tire.fingerprint()
        .map(|k| k.to_string())
        .unwrap_or_else(|| "(unreadable)".to_string())
}

fn print_tire_table(tires: &[TireObservation]) {
    println!(
        "{:<12} {:<10} {:<14} {:<10} {}",
        "Position", "Week/Year", "Brand", "Condition", "DOT"
    );
    println!("{}", "-".repeat(64));
    for tire in tires {
        println!(
            "{:<12} {:<10} {:<14} {:<10} {}",
            tire.position.as_str(),
            key_text(tire),
            truncate(&tire.brand.to_string(), 14),
            tire.condition.as_str(),
            tire.dot
        );
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}~", cut)
    }
}

pub fn output_outcome(output_format: OutputFormat, outcome: &VerificationOutcome) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(outcome);
    }

    let result = &outcome.record.result;
    println!("\nVerification Result");
    println!("===================");
    println!("Plate:           {}", result.plate);
    println!("Verification:    {}", outcome.record.id);
    let headline = match result.status {
        VerificationStatus::Ok => "OK - tires match the registered set",
        VerificationStatus::Rotated => "ROTATED - same tires at different positions (informational)",
        VerificationStatus::Fraud => "FRAUD - unregistered tires found (critical)",
    };
    println!("Status:          {}", headline);
    println!();

    println!("{:<12} {:<12} {:<12} {}", "Position", "Registered", "Scanned", "Check");
    println!("{}", "-".repeat(48));
    for annotated in &result.annotated_tires {
        let registered = result
            .baseline_snapshot
            .iter()
            .find(|t| t.position == annotated.position())
            .map(key_text)
            .unwrap_or_default();
        println!(
            "{:<12} {:<12} {:<12} {}",
            annotated.position().as_str(),
            registered,
            key_text(&annotated.tire),
            if annotated.is_fraud() { "NOT REGISTERED" } else { "ok" }
        );
    }

    if !result.missing_keys.is_empty() {
        let missing: Vec<String> = result.missing_keys.iter().map(|k| k.to_string()).collect();
        println!("\nRegistered tires not found: {}", missing.join(", "));
    }

    if let Some(ref alert) = outcome.alert {
        println!("\nAlert:           {} ({}, {})", alert.id, alert.kind, alert.severity);
    }

    println!("\nWrites:          ledger {}, alert {}, baseline {}",
        outcome.effects.ledger, outcome.effects.alert, outcome.effects.baseline);

    Ok(())
}

pub fn output_vehicle(output_format: OutputFormat, vehicle: &VehicleBaseline) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(vehicle);
    }

    println!("\nVehicle {}", vehicle.plate);
    println!("===============");
    println!("ID:              {}", vehicle.vehicle_id);
    println!("Baseline ver.:   {}", vehicle.version);
    println!("Registered:      {}", vehicle.created_at.format("%Y-%m-%d %H:%M"));
    println!("Updated:         {}", vehicle.updated_at.format("%Y-%m-%d %H:%M"));
    if let Some(ref by) = vehicle.registered_by {
        println!("Registered by:   {}", by);
    }
    println!();
    print_tire_table(&vehicle.tires);
    Ok(())
}

pub fn output_vehicles(output_format: OutputFormat, vehicles: &[VehicleBaseline]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(vehicles);
    }

    if vehicles.is_empty() {
        println!("No vehicles registered");
        return Ok(());
    }

    println!("{:<10} {:<8} {:<18} {}", "Plate", "Version", "Registered", "Updated");
    println!("{}", "-".repeat(60));
    for v in vehicles {
        println!(
            "{:<10} {:<8} {:<18} {}",
            v.plate.as_str(),
            v.version,
            v.created_at.format("%Y-%m-%d %H:%M").to_string(),
            v.updated_at.format("%Y-%m-%d %H:%M")
        );
    }
    println!("\nTotal: {} vehicles", vehicles.len());
    Ok(())
}

pub fn output_history(
    output_format: OutputFormat,
    plate: &Plate,
    records: &[VerificationRecord],
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(records);
    }

    if records.is_empty() {
        println!("No verifications for {}", plate);
        return Ok(());
    }

    println!("Verification history for {}", plate);
    println!("{:<18} {:<8} {:<10} {}", "Date", "Status", "Operator", "ID");
    println!("{}", "-".repeat(76));
    for r in records {
        println!(
            "{:<18} {:<8} {:<10} {}",
            r.result.created_at.format("%Y-%m-%d %H:%M").to_string(),
            r.status().as_str(),
            truncate(r.operator.as_deref().unwrap_or("-"), 10),
            r.id
        );
    }
    Ok(())
}

pub fn output_alerts(output_format: OutputFormat, alerts: &[Alert]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(alerts);
    }

    if alerts.is_empty() {
        println!("No alerts");
        return Ok(());
    }

    println!(
        "{:<18} {:<10} {:<16} {:<14} {:<9} {}",
        "Date", "Plate", "Kind", "Severity", "Status", "ID"
    );
    println!("{}", "-".repeat(110));
    for a in alerts {
        println!(
            "{:<18} {:<10} {:<16} {:<14} {:<9} {}",
            a.created_at.format("%Y-%m-%d %H:%M").to_string(),
            a.plate.as_str(),
            a.kind.to_string(),
            a.severity.to_string(),
            a.status.to_string(),
            a.id
        );
    }

    let pending = alerts.iter().filter(|a| a.is_pending()).count();
    println!("\nTotal: {} alerts ({} pending)", alerts.len(), pending);
    Ok(())
}

pub fn output_alert(output_format: OutputFormat, alert: &Alert) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(alert);
    }

    println!("\nAlert {}", alert.id);
    println!("Plate:           {}", alert.plate);
    println!("Kind:            {} ({})", alert.kind, alert.severity);
    println!("Status:          {}", alert.status);
    if let Some(ref note) = alert.details.note {
        println!("Details:         {}", note);
    }
    if let Some(resolved_at) = alert.resolved_at {
        println!("Resolved:        {}", resolved_at.format("%Y-%m-%d %H:%M"));
    }
    if let Some(ref notes) = alert.notes {
        println!("Notes:           {}", notes);
    }
    if alert.kind == AlertKind::Fraud {
        let positions: Vec<&str> = alert
            .implicated_tires()
            .iter()
            .map(|t| t.position().as_str())
            .collect();
        println!("Implicated:      {}", positions.join(", "));
    }
    Ok(())
}

pub fn output_import(output_format: OutputFormat, summary: &ImportSummary) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(summary);
    }

    println!("Registered: {}", summary.registered.len());
    for plate in &summary.registered {
        println!("  + {}", plate);
    }
    if !summary.skipped.is_empty() {
        println!("Skipped (already registered): {}", summary.skipped.len());
        for plate in &summary.skipped {
            println!("  = {}", plate);
        }
    }
    Ok(())
}
