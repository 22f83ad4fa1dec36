//! Subcommand implementations.

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use oes_core::{
    CorrectionSession, Dataset, DriftEngine, OptimizeScope, ReferenceTable, ScanEvent,
    ScanWorker, scan_references,
};
use oes_ingest::read_run_table;
use oes_model::{
    ChangeLog, CorrectionOptions, ElementName, PreviewContext, ScanOptions, ToleranceBands,
    VerificationAnnotation,
};
use oes_verify::{BlankCandidate, CrmGroup, build_annotations, select_blank};

use crate::cli::{CorrectArgs, OptimizeArg, ScanArgs, VerifyArgs};
use crate::summary::{print_change_log, print_reference_table};

fn load_dataset(path: &std::path::Path) -> Result<Dataset> {
    let table = read_run_table(path)?;
    let dataset = Dataset::from_table(&table)
        .with_context(|| format!("build dataset from {}", path.display()))?;
    if dataset.is_empty() {
        bail!("{} contains no data rows", path.display());
    }
    Ok(dataset)
}

pub fn run_scan(args: &ScanArgs) -> Result<ReferenceTable> {
    let dataset = load_dataset(&args.run_csv)?;
    let options = ScanOptions::default().with_keyword(&args.keyword);

    let bar = ProgressBar::new(dataset.len() as u64);
    bar.set_style(ProgressStyle::with_template(
        "{spinner} scanning {pos}/{len} rows",
    )?);
    let (worker, events) = ScanWorker::spawn(dataset, options);
    let mut outcome = None;
    for event in events.iter() {
        match event {
            ScanEvent::Progress { rows_scanned, .. } => bar.set_position(rows_scanned as u64),
            ScanEvent::Finished(result) => {
                outcome = Some(result);
                break;
            }
        }
    }
    worker.join();
    bar.finish_and_clear();

    let table = outcome
        .context("scan worker exited without a result")?
        .with_context(|| format!("scan {}", args.run_csv.display()))?;
    print_reference_table(&table);
    Ok(table)
}

pub fn run_correct(args: &CorrectArgs) -> Result<ChangeLog> {
    let dataset = load_dataset(&args.run_csv)?;
    let element = ElementName::new(&args.element)
        .with_context(|| format!("element name {:?}", args.element))?;
    if !dataset.elements().contains(&element) {
        bail!(
            "element {:?} is not a numeric column of {}",
            args.element,
            args.run_csv.display()
        );
    }
    let options = ScanOptions::default().with_keyword(&args.keyword);
    let references = scan_references(&dataset, &options)
        .with_context(|| format!("scan {}", args.run_csv.display()))?;

    let reference_number = match args.reference {
        Some(number) => number,
        None => *references
            .reference_numbers()
            .iter()
            .next()
            .context("no reference groups found")?,
    };
    let scope = if args.global {
        OptimizeScope::Global
    } else {
        OptimizeScope::Segment
    };

    let mut session = CorrectionSession::new(dataset, references);
    let partitions = session.dataset.partitions().to_vec();
    {
        let mut engine = DriftEngine::new(
            &mut session.references,
            element.clone(),
            reference_number,
            &partitions,
        );
        match args.optimize {
            OptimizeArg::None => {}
            OptimizeArg::Flat => engine.flat_optimize(scope),
            OptimizeArg::ZeroSlope => engine.slope_to_zero(scope),
        }
    }

    let correction = CorrectionOptions {
        stepwise: args.stepwise,
        ..CorrectionOptions::default()
    };
    let outcome = session.apply_group(&element, reference_number, &correction);
    if !outcome.applied {
        info!(reference_number, "nothing to apply");
    }
    print_change_log(&session.change_log);

    if let Some(path) = &args.json {
        let export = serde_json::json!({
            "generated": chrono::Utc::now().to_rfc3339(),
            "run": args.run_csv.display().to_string(),
            "element": element.as_str(),
            "reference_number": reference_number,
            "corrected_rows": outcome.corrected_rows,
            "change_log": &session.change_log,
        });
        std::fs::write(path, serde_json::to_vec_pretty(&export)?)
            .with_context(|| format!("write change-log json: {}", path.display()))?;
    }
    Ok(session.change_log)
}

pub fn run_verify(args: &VerifyArgs) -> Result<Vec<VerificationAnnotation>> {
    let dataset = load_dataset(&args.run_csv)?;
    let element = ElementName::new(&args.element)
        .with_context(|| format!("element name {:?}", args.element))?;

    let mut groups = Vec::new();
    let mut candidates = Vec::new();
    for row in dataset.rows() {
        let Some(value) = row.value(&element) else {
            continue;
        };
        let label = row.solution_label.as_str();
        if starts_with_ignore_case(label, &args.crm_label) {
            groups.push(CrmGroup {
                solution_label: label.to_string(),
                certified_value: args.certified,
                measured_value: value,
            });
        } else if starts_with_ignore_case(label, &args.blank_label) {
            candidates.push(BlankCandidate {
                solution_label: label.to_string(),
                value,
            });
        }
    }
    if groups.is_empty() {
        bail!(
            "no rows matched CRM label prefix {:?} in {}",
            args.crm_label,
            args.run_csv.display()
        );
    }

    let bands = ToleranceBands {
        range_low: args.range_low,
        range_mid: args.range_mid,
        range_high1: args.range_high1,
        range_high2: args.range_high2,
        range_high3: args.range_high3,
        range_high4: args.range_high4,
    };
    let blank = select_blank(&groups, &candidates, &bands)
        .map(|selection| selection.candidate.value)
        .unwrap_or(0.0);
    let context = PreviewContext::new().with_blank(blank);
    let annotations = build_annotations(&element, &groups, &context, &bands);
    for annotation in &annotations {
        println!("{}", annotation.display_line());
    }
    Ok(annotations)
}

fn starts_with_ignore_case(label: &str, prefix: &str) -> bool {
    label
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
