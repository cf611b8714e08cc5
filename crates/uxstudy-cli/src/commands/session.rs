//! The `uxstudy session` command: a guided walkthrough for one participant.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use uxstudy_core::builders::{
    ConsentForm, DemographicForm, ExitForm, TaskForm, AGE_RANGE, NPS_RANGE,
};
use uxstudy_core::config::StudyConfig;
use uxstudy_core::likert::{Agreement, LikertScale, Quality};
use uxstudy_core::model::{Education, Gender, TaskOutcome};
use uxstudy_core::session::Session;
use uxstudy_core::{Study, Submission};
use uxstudy_storage::CsvStore;

use crate::prompt::Prompter;

const CONSENT_TEXT: &str = "\
Purpose: You are invited to participate in a usability study to evaluate the usability of a prototype or application.
Procedures: You will complete short tasks and answer survey questions. The session is expected to last no more than 15 minutes.
Risks & Benefits: Minimal risk. Your feedback will help improve the design.
Voluntary Participation: Your participation is voluntary. You may withdraw at any time without penalty.
Data & Privacy: We will collect anonymized task performance and questionnaire responses. Do not enter personal or sensitive data.
Contact: If you have questions about this study, contact the researcher/instructor.

By agreeing below, you confirm that you have read and agree to the terms above and consent to participate in this usability study.";

pub fn execute(
    config_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    participant_id: Option<String>,
    participant_notes: bool,
) -> Result<()> {
    let config = super::load_settings(config_path, data_dir)?;
    let store = CsvStore::open(&config.data_dir)
        .with_context(|| format!("failed to open data directory {}", config.data_dir.display()))?;

    let mut session = Session::new();
    session.observer_mode = config.observer_mode && !participant_notes;
    let fixed_id = participant_id.is_some();
    if let Some(id) = participant_id {
        session.set_participant_id(id);
    }

    let mut study = Study::with_session(Arc::new(store), session);
    let stdin = std::io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), std::io::stdout());
    run(&mut study, &config, &mut prompter, fixed_id)
}

/// Walk one participant through every stage.
pub fn run<R: BufRead, W: Write>(
    study: &mut Study,
    config: &StudyConfig,
    p: &mut Prompter<R, W>,
    fixed_id: bool,
) -> Result<()> {
    p.say("Usability study session")?;

    let generated = study.participant_id();
    if !fixed_id {
        let answer = p.text("Participant ID", &generated)?;
        if answer != generated {
            study.session_mut().set_participant_id(answer);
        }
    }
    let pid = study.participant_id();
    p.say(format_args!("Participant: {pid}"))?;
    tracing::info!(participant_id = %pid, "session started");

    if !consent_stage(study, p)? {
        p.say("No consent given; nothing was recorded.")?;
        return Ok(());
    }
    demographics_stage(study, p)?;
    task_stage(study, config, p)?;
    exit_stage(study, p)?;

    p.say(format_args!("\nThank you! Session complete for {pid}."))?;
    Ok(())
}

fn consent_stage<R: BufRead, W: Write>(study: &mut Study, p: &mut Prompter<R, W>) -> Result<bool> {
    p.say("\n== Consent Form ==")?;
    p.say(CONSENT_TEXT)?;

    loop {
        let form = ConsentForm {
            consent_given: p.confirm("I have read and agree to the consent terms.", false)?,
            display_name: p.text("Participant (optional display name)", "")?,
        };
        match study.submit_consent(&form)? {
            Submission::Recorded(_) => {
                p.say("Consent recorded.")?;
                return Ok(true);
            }
            Submission::Rejected(rejection) => {
                p.warn(rejection)?;
                if !p.confirm("Try again?", true)? {
                    return Ok(false);
                }
            }
        }
    }
}

fn demographics_stage<R: BufRead, W: Write>(
    study: &mut Study,
    p: &mut Prompter<R, W>,
) -> Result<()> {
    p.say("\n== Demographic Questionnaire ==")?;

    let name = p.text("Name or Alias (optional)", "")?;
    let age = p.number("Age", 25u32, AGE_RANGE)?;

    let gender_label = Gender::OPTIONS[p.choose("Gender (optional)", &Gender::OPTIONS, 0)?];
    let free_text = if gender_label == "Self-describe" {
        p.text("Please self-describe your gender", "")?
    } else {
        String::new()
    };
    let gender = Gender::from_option(gender_label, &free_text)
        .with_context(|| format!("unknown gender option: {gender_label}"))?;

    let occupation = p.text("Occupation/Role", "Student")?;
    let education_labels = Education::ALL.map(Education::label);
    let education = Education::ALL[p.choose("Highest Education", &education_labels, 0)?];
    let country = p.text("Country/Region (optional)", "")?;
    let familiarity = choose_scale(p, "Familiarity with similar tools", Quality::Fair)?;

    let form = DemographicForm {
        name,
        age,
        gender,
        occupation,
        education,
        country,
        familiarity,
    };
    announce(p, study.submit_demographics(&form)?, "Demographic data saved.")
}

fn task_stage<R: BufRead, W: Write>(
    study: &mut Study,
    config: &StudyConfig,
    p: &mut Prompter<R, W>,
) -> Result<()> {
    p.say("\n== Tasks ==")?;

    let mut options: Vec<&str> = config.tasks.iter().map(|t| t.name.as_str()).collect();
    options.push("Finish tasks");
    let finish = options.len() - 1;

    loop {
        let choice = p.choose("Select Task", &options, 0)?;
        if choice == finish {
            return Ok(());
        }
        let task = &config.tasks[choice];
        if !task.description.is_empty() {
            p.say(format_args!("Task Description: {}", task.description))?;
        }

        let answer = p.line("Press Enter to start the task timer (type 's' to skip timing)")?;
        if answer.trim().is_empty() {
            study.start_timer();
            p.say("Timer started.")?;
            p.line("Press Enter to stop the timer")?;
            match study.stop_timer() {
                Some(elapsed) => p.say(format_args!(
                    "Timer stopped. Duration: {:.2} seconds",
                    elapsed.as_secs_f64()
                ))?,
                None => p.warn("Timer was not started.")?,
            }
        }

        let outcome_labels = TaskOutcome::ALL.map(|o| o.to_string());
        let outcome_refs: Vec<&str> = outcome_labels.iter().map(String::as_str).collect();
        let outcome = TaskOutcome::ALL[p.choose("Task outcome", &outcome_refs, 0)?];
        let errors = p.number("Number of noticeable errors", 0u32, 0..=u32::MAX)?;
        let difficulty = choose_scale(p, "Perceived task difficulty", Quality::Fair)?;
        let satisfaction = choose_scale(p, "Task satisfaction", Quality::Good)?;
        let notes = p.text(study.session().notes_label(), "")?;

        let form = TaskForm {
            task_name: task.name.clone(),
            outcome,
            errors,
            difficulty,
            satisfaction,
            notes,
        };
        announce(p, study.submit_task(&form)?, "Task results saved.")?;
    }
}

fn exit_stage<R: BufRead, W: Write>(study: &mut Study, p: &mut Prompter<R, W>) -> Result<()> {
    p.say("\n== Exit Questionnaire ==")?;
    p.say("Please answer the following questions about your overall experience.")?;

    let form = ExitForm {
        satisfaction: choose_scale(p, "Overall satisfaction", Agreement::Agree)?,
        ease_of_use: choose_scale(p, "The system was easy to use", Agreement::Agree)?,
        efficiency: choose_scale(p, "I could complete tasks efficiently", Agreement::Agree)?,
        learnability: choose_scale(p, "The system was easy to learn", Agreement::Agree)?,
        error_prevention: choose_scale(
            p,
            "The system helped me avoid errors",
            Agreement::Neutral,
        )?,
        nps: p.number(
            "How likely are you to recommend this product to a friend or colleague? (0-10)",
            7u8,
            NPS_RANGE,
        )?,
        likes: p.text("What did you like most?", "")?,
        dislikes: p.text("What did you like least?", "")?,
        suggestions: p.text("What would you improve?", "")?,
    };
    announce(p, study.submit_exit(&form)?, "Exit questionnaire data saved.")
}

fn choose_scale<S, R, W>(p: &mut Prompter<R, W>, prompt: &str, default: S) -> Result<S>
where
    S: LikertScale + PartialEq,
    R: BufRead,
    W: Write,
{
    let labels = S::labels();
    let default_idx = S::ALL.iter().position(|o| *o == default).unwrap_or(0);
    Ok(S::ALL[p.choose(prompt, &labels, default_idx)?])
}

fn announce<T, R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    submission: Submission<T>,
    saved: &str,
) -> Result<()> {
    match submission {
        Submission::Recorded(_) => p.say(saved),
        Submission::Rejected(rejection) => p.warn(rejection),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uxstudy_core::model::Dataset;
    use uxstudy_core::{MemoryStore, RecordStore};

    fn run_script(script: &str) -> (Arc<MemoryStore>, String) {
        let store = Arc::new(MemoryStore::new());
        let mut study = Study::new(store.clone());
        study.session_mut().set_participant_id("P-test0001");
        let mut output = Vec::new();
        {
            let mut p = Prompter::new(script.as_bytes(), &mut output);
            run(&mut study, &StudyConfig::default(), &mut p, true).unwrap();
        }
        (store, String::from_utf8(output).unwrap())
    }

    #[test]
    fn declined_consent_records_nothing() {
        let (store, out) = run_script("n\n\nn\n");
        assert!(out.contains("Warning: you must agree to the consent terms"));
        assert!(out.contains("nothing was recorded"));
        for dataset in Dataset::ALL {
            assert_eq!(store.count(dataset).unwrap(), 0);
        }
    }

    #[test]
    fn full_walkthrough_records_every_stage() {
        let script = concat!(
            // consent
            "y\nAlex\n",
            // demographics: name, age, gender, self-description, occupation,
            // education, country, familiarity
            "\n31\n5\nnonbinary femme\n\n4\nNZ\n4\n",
            // one untimed task, then finish
            "2\ns\n2\n1\n\n\nstalled on the form\n",
            "4\n",
            // exit
            "5\n\n\n\n\n9\nclean layout\nslow signup\nfewer fields\n",
        );
        let (store, out) = run_script(script);
        assert!(out.contains("Consent recorded."));
        assert!(out.contains("Demographic data saved."));
        assert!(out.contains("Task results saved."));
        assert!(out.contains("Exit questionnaire data saved."));
        assert!(out.contains("Observer Notes"));

        let demo = &store.load(Dataset::Demographic).unwrap()[0];
        assert_eq!(demo.get("age"), Some("31"));
        assert_eq!(demo.get("gender"), Some("nonbinary femme"));
        assert_eq!(demo.get("education"), Some("Bachelor"));
        assert_eq!(demo.get("familiarity_1to5"), Some("4"));

        let task = &store.load(Dataset::Task).unwrap()[0];
        assert_eq!(task.get("task_name"), Some("Task 2: Create an account"));
        assert_eq!(task.get("success"), Some("Partial"));
        assert_eq!(task.get("errors"), Some("1"));
        assert_eq!(task.get("duration_seconds"), Some(""));
        assert_eq!(task.get("notes"), Some("stalled on the form"));

        let exit = &store.load(Dataset::Exit).unwrap()[0];
        assert_eq!(exit.get("satisfaction_1to5"), Some("5"));
        assert_eq!(exit.get("error_prevention_1to5"), Some("3"));
        assert_eq!(exit.get("nps_0to10"), Some("9"));
    }

    #[test]
    fn timed_task_stores_duration() {
        let script = concat!(
            "y\n\n",
            "\n\n\n\n\n\n\n",
            "1\n\n\n\n\n\n\n\n",
            "4\n",
            "\n\n\n\n\n\n\n\n\n",
        );
        let (store, out) = run_script(script);
        assert!(out.contains("Timer stopped. Duration:"));
        let task = &store.load(Dataset::Task).unwrap()[0];
        let seconds: f64 = task.get("duration_seconds").unwrap().parse().unwrap();
        assert!(seconds >= 0.0);
    }

    #[test]
    fn error_count_has_no_upper_limit() {
        let script = concat!(
            "y\n\n",
            "\n\n\n\n\n\n\n",
            "1\ns\n\n1500\n\n\n\n",
            "4\n",
            "\n\n\n\n\n\n\n\n\n",
        );
        let (store, out) = run_script(script);
        assert!(!out.contains("Please enter a number between"));
        let task = &store.load(Dataset::Task).unwrap()[0];
        assert_eq!(task.get("errors"), Some("1500"));
    }

    #[test]
    fn truncated_input_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        let mut study = Study::new(store);
        let mut p = Prompter::new("y\n".as_bytes(), Vec::new());
        assert!(run(&mut study, &StudyConfig::default(), &mut p, true).is_err());
    }
}
