//! Command dispatch.
//!
//! Every command runs against one [`AppContext`]. Commands other than `init`,
//! `config` and `login` stop early when the session probe finds no user.

use super::output::Output;
use super::{
    CareerCommands, CaseCommands, CaseScope, Commands, DocumentCommands, PaymentCommands,
};
use crate::assistant::{Assistant, Sender};
use crate::types::{
    AppError, Beneficiary, Career, CareerPatch, Case, CaseFilter, CaseId, CasePatch,
    CaseStatus, Document, DocumentPatch, DocumentUpload, Payment, PaymentPatch, Result,
    UploadFile,
};
use crate::views::{
    case_label, payment_total, payment_type_breakdown, AlwaysConfirm, CaseDetail,
    CaseSelector, Confirm, DetailOutcome, ScopedList, ScopedResource, ViewState,
};
use crate::AppContext;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

/// Run one command to completion.
pub async fn dispatch(
    ctx: &mut AppContext,
    command: Commands,
    config_path: &Path,
    output: &Output,
) -> Result<()> {
    if !command.skips_session_gate() && !ctx.start().await {
        output.warning("You are not signed in");
        output.hint("Sign in at the identity provider, then store the access token:");
        output.command("pension-desk login --token <access-token>");
        return Err(AppError::Unauthorized);
    }

    match command {
        Commands::Init { .. } => {
            // Handled before a context exists.
            Ok(())
        }
        Commands::Config { validate } => show_config(ctx, config_path, validate, output),
        Commands::Login { token } => login(ctx, token, output).await,
        Commands::Logout => {
            ctx.shutdown().await;
            output.success("Signed out");
            Ok(())
        }
        Commands::Whoami => {
            whoami(ctx, output);
            Ok(())
        }
        Commands::Cases(cmd) => cases(ctx, cmd, output).await,
        Commands::Careers(cmd) => careers(ctx, cmd, output).await,
        Commands::Payments(cmd) => payments(ctx, cmd, output).await,
        Commands::Documents(cmd) => documents(ctx, cmd, output).await,
        Commands::Select { filter } => select(ctx, &filter, output).await,
        Commands::Stats { monthly } => stats(ctx, monthly, output).await,
        Commands::Chat { message } => chat(ctx, message, output).await,
    }
}

// ============= Session Commands =============

fn show_config(ctx: &AppContext, path: &Path, validate: bool, output: &Output) -> Result<()> {
    // Loading already validated; reaching this point means the file is sound.
    if validate {
        output.success(&format!("{} is valid", path.display()));
        return Ok(());
    }

    let config = &ctx.config;
    output.header("Configuration");
    output.kv("file", &path.display().to_string());
    output.kv("api.base_url", &config.api.base_url);
    output.kv("identity.login_url", &config.identity.login_url);
    output.kv("identity.logout_url", &config.identity.logout_url);
    output.kv(
        "session.token_path",
        &config.session.token_path.display().to_string(),
    );
    output.kv("logging.level", &config.logging.level);
    Ok(())
}

async fn login(ctx: &mut AppContext, token: Option<String>, output: &Output) -> Result<()> {
    let Some(token) = token else {
        ctx.session.login();
        output.hint("After signing in, run: pension-desk login --token <access-token>");
        return Ok(());
    };

    ctx.session.store_token(&token)?;
    match ctx.session.check_auth_status().await {
        Some(user) => {
            output.success(&format!("Signed in as {}", user.username));
            Ok(())
        }
        None => {
            output.warning("Token stored, but the backend did not accept it");
            Err(AppError::Unauthorized)
        }
    }
}

fn whoami(ctx: &AppContext, output: &Output) {
    let Some(user) = ctx.session.user() else {
        output.warning("No user");
        return;
    };

    output.header("Current user");
    output.kv("id", &user.id);
    output.kv("username", &user.username);
    output.kv("email", or_dash(&user.email));
    output.kv("admin", &user.is_admin.to_string());
    output.kv("user", &user.is_user.to_string());
    if user.roles.is_empty() {
        output.kv("roles", "-");
    } else {
        output.subheader("Roles");
        for role in &user.roles {
            output.list_item(role);
        }
    }
}

// ============= Case Commands =============

async fn cases(ctx: &AppContext, cmd: CaseCommands, output: &Output) -> Result<()> {
    match cmd {
        CaseCommands::List { status, filter } => {
            list_cases(ctx, status.map(CaseStatus::from), filter.as_deref(), output).await
        }
        CaseCommands::Show { id } => {
            let mut detail =
                CaseDetail::new(ctx.services.cases.clone(), ctx.services.careers.clone());
            match detail.load(id).await {
                DetailOutcome::Show(case) => {
                    render_case(&case, output);
                    Ok(())
                }
                DetailOutcome::BackToList => {
                    output.banner(&format!("Case #{} could not be loaded", id));
                    list_cases(ctx, None, None, output).await
                }
            }
        }
        CaseCommands::Create {
            ssn,
            last_name,
            first_name,
            birth_date,
            email,
            phone,
            address,
        } => {
            let draft = Case::draft(
                ssn,
                Beneficiary {
                    id: None,
                    last_name,
                    first_name,
                    birth_date,
                    email,
                    phone,
                    address,
                },
            );
            let created = ctx.services.cases.create(&draft).await.inspect_err(|e| {
                output.banner(&e.banner("create case"));
            })?;
            output.success(&format!(
                "Case #{} created for {}",
                id_or_dash(created.id),
                created.beneficiary_name()
            ));
            Ok(())
        }
        CaseCommands::Update { id, ssn } => {
            let mut detail = loaded_detail(ctx, id, output).await?;
            let patch = CasePatch {
                social_security_number: Some(ssn),
                ..Default::default()
            };
            let case = detail.update(&patch).await?;
            output.success(&format!("Case #{} updated", id));
            render_case(case, output);
            Ok(())
        }
        CaseCommands::Status { id, status } => {
            let mut detail = loaded_detail(ctx, id, output).await?;
            let case = detail.update_status(status.into()).await?;
            output.success(&format!("Case #{} is now {}", id, case.status));
            Ok(())
        }
        CaseCommands::Delete { id, yes } => {
            let mut list = ScopedList::new(ctx.services.cases.clone());
            let confirm = confirmer(yes, output);
            let deleted = list.delete(id, confirm).await;
            report_delete(&list, deleted, id, output)
        }
        CaseCommands::Estimate { id, local } => {
            let detail = loaded_detail(ctx, id, output).await?;
            let estimate = if local {
                detail.estimate_local().await?
            } else {
                detail.estimate(&ctx.estimator()).await?
            };

            output.header(&format!("Pension estimate for case #{}", id));
            output.kv("monthly amount", &format!("{:.0} EUR", estimate.amount));
            output.kv(
                "average annual salary",
                &format!("{:.0} EUR", estimate.details.average_salary),
            );
            output.kv(
                "validated quarters",
                &estimate.details.validated_quarters.to_string(),
            );
            output.kv("rate", &format!("{:.2} %", estimate.details.rate));
            output.kv("source", &estimate.source.to_string());
            if estimate.is_fallback() {
                output.warning("Approximation computed locally; the backend figure may differ");
            }
            Ok(())
        }
    }
}

async fn list_cases(
    ctx: &AppContext,
    status: Option<CaseStatus>,
    filter: Option<&str>,
    output: &Output,
) -> Result<()> {
    let mut list = ScopedList::new(ctx.services.cases.clone());
    list.select(Some(CaseFilter { status })).await;

    let rows: Vec<Vec<String>> = list
        .rows()
        .iter()
        .filter(|case| filter.map_or(true, |f| crate::views::matches_filter(case, f)))
        .map(case_row)
        .collect();

    output.header("Cases");
    render_state(
        &mut list,
        rows,
        &["ID", "SSN", "Beneficiary", "Status", "Created"],
        output,
    )
}

async fn loaded_detail(ctx: &AppContext, id: CaseId, output: &Output) -> Result<CaseDetail> {
    let mut detail = CaseDetail::new(ctx.services.cases.clone(), ctx.services.careers.clone());
    match detail.load(id).await {
        DetailOutcome::Show(_) => Ok(detail),
        DetailOutcome::BackToList => {
            output.banner(&format!("Case #{} could not be loaded", id));
            Err(AppError::NotFound(format!("case {}", id)))
        }
    }
}

fn render_case(case: &Case, output: &Output) {
    output.header(&format!("Case #{}", id_or_dash(case.id)));
    output.kv("social-insurance number", &case.social_security_number);
    output.kv("status", &case.status.to_string());
    output.kv("created", &date_or_dash(case.created_on));

    if let Some(b) = &case.beneficiary {
        output.subheader("Beneficiary");
        output.kv("name", &b.full_name());
        output.kv("birth date", &date_or_dash(b.birth_date));
        output.kv("email", or_dash(&b.email));
        output.kv("phone", b.phone.as_deref().unwrap_or("-"));
        output.kv("address", b.address.as_deref().unwrap_or("-"));
    }

    output.subheader("Attached records");
    output.kv("careers", &case.careers.len().to_string());
    output.kv("payments", &case.payments.len().to_string());
    output.kv("documents", &case.documents.len().to_string());
}

// ============= Scoped Commands =============

/// Resolve `--case` / `--search` to a case id. Neither given means no
/// selection; a search must match exactly one case.
async fn resolve_scope(
    ctx: &AppContext,
    scope: &CaseScope,
    output: &Output,
) -> Result<Option<CaseId>> {
    if let Some(id) = scope.case_id {
        return Ok(Some(id));
    }
    let Some(search) = scope.search.as_deref() else {
        return Ok(None);
    };

    let mut selector = CaseSelector::new(ctx.services.cases.clone());
    selector.load().await?;
    selector.set_filter(search);

    let matches: Vec<(Option<CaseId>, String)> = selector
        .options()
        .into_iter()
        .map(|case| (case.id, case_label(case)))
        .collect();

    match matches.as_slice() {
        [] => Err(AppError::Validation(format!("No case matches '{}'", search))),
        [(id, label)] => {
            let selected = selector.select(*id);
            debug!(case_id = ?selected, "Resolved case '{}'", label);
            output.info(&format!("Case: {}", label));
            Ok(selected)
        }
        many => {
            output.warning(&format!("'{}' matches {} cases:", search, many.len()));
            for (id, label) in many {
                output.list_item(&format!("#{} {}", id_or_dash(*id), label));
            }
            Err(AppError::Validation(
                "Narrow the search or pass --case <id>".to_string(),
            ))
        }
    }
}

async fn scoped_list<R: ScopedResource<Scope = CaseId>>(
    ctx: &AppContext,
    resource: R,
    scope: &CaseScope,
    output: &Output,
) -> Result<ScopedList<R>> {
    let case_id = resolve_scope(ctx, scope, output).await?;
    let mut list = ScopedList::new(resource);
    list.select(case_id).await;
    Ok(list)
}

async fn careers(ctx: &AppContext, cmd: CareerCommands, output: &Output) -> Result<()> {
    const COLUMNS: [&str; 8] = [
        "ID", "Employer", "Role", "Start", "End", "Salary", "Regime", "Quarters",
    ];

    match cmd {
        CareerCommands::List { scope } => {
            let mut list = scoped_list(ctx, ctx.services.careers.clone(), &scope, output).await?;
            output.header("Careers");
            let rows = list.rows().iter().map(career_row).collect();
            render_state(&mut list, rows, &COLUMNS, output)
        }
        CareerCommands::Add {
            scope,
            employer,
            role,
            start,
            end,
            salary,
            regime,
            quarters,
        } => {
            let mut list = scoped_list(ctx, ctx.services.careers.clone(), &scope, output).await?;
            let draft = Career {
                id: None,
                employer,
                role,
                start_date: start,
                end_date: end,
                average_salary: salary,
                regime: regime.into(),
                validated_quarters: quarters,
                case_id: None,
            };
            let result = list.create(&draft).await;
            let created = with_banner(&list, result, output)?;
            output.success(&format!("Career #{} added", id_or_dash(created.id)));
            let rows = list.rows().iter().map(career_row).collect();
            render_state(&mut list, rows, &COLUMNS, output)
        }
        CareerCommands::Update {
            scope,
            id,
            employer,
            role,
            end,
            salary,
            quarters,
        } => {
            let mut list = scoped_list(ctx, ctx.services.careers.clone(), &scope, output).await?;
            let patch = CareerPatch {
                employer,
                role,
                end_date: end,
                average_salary: salary,
                validated_quarters: quarters,
                ..Default::default()
            };
            let result = list.update(id, &patch).await;
            with_banner(&list, result, output)?;
            output.success(&format!("Career #{} updated", id));
            Ok(())
        }
        CareerCommands::Delete { scope, id, yes } => {
            let mut list = scoped_list(ctx, ctx.services.careers.clone(), &scope, output).await?;
            let deleted = list.delete(id, confirmer(yes, output)).await;
            report_delete(&list, deleted, id, output)
        }
    }
}

async fn payments(ctx: &AppContext, cmd: PaymentCommands, output: &Output) -> Result<()> {
    match cmd {
        PaymentCommands::List { scope } => {
            let mut list = scoped_list(ctx, ctx.services.payments.clone(), &scope, output).await?;
            render_payments(&mut list, output)
        }
        PaymentCommands::Add {
            scope,
            amount,
            date,
            kind,
            reference,
        } => {
            let mut list = scoped_list(ctx, ctx.services.payments.clone(), &scope, output).await?;
            let draft = Payment {
                id: None,
                amount,
                disbursement_date: date,
                execution_date: None,
                payment_type: kind.into(),
                reference,
                status: Default::default(),
                case_id: None,
            };
            let result = list.create(&draft).await;
            let created = with_banner(&list, result, output)?;
            output.success(&format!("Payment #{} added", id_or_dash(created.id)));
            render_payments(&mut list, output)
        }
        PaymentCommands::Update {
            scope,
            id,
            amount,
            executed,
            status,
        } => {
            let mut list = scoped_list(ctx, ctx.services.payments.clone(), &scope, output).await?;
            let patch = PaymentPatch {
                amount,
                execution_date: executed,
                status: status.map(Into::into),
                ..Default::default()
            };
            let result = list.update(id, &patch).await;
            with_banner(&list, result, output)?;
            output.success(&format!("Payment #{} updated", id));
            Ok(())
        }
        PaymentCommands::Delete { scope, id, yes } => {
            let mut list = scoped_list(ctx, ctx.services.payments.clone(), &scope, output).await?;
            let deleted = list.delete(id, confirmer(yes, output)).await;
            report_delete(&list, deleted, id, output)
        }
    }
}

fn render_payments<R: ScopedResource<Row = Payment>>(
    list: &mut ScopedList<R>,
    output: &Output,
) -> Result<()> {
    output.header("Payments");
    let rows = list.rows().iter().map(payment_row).collect();
    render_state(
        list,
        rows,
        &["ID", "Disbursed", "Amount", "Type", "Status", "Reference"],
        output,
    )?;

    if !list.rows().is_empty() {
        output.subheader("By type");
        for (kind, count) in payment_type_breakdown(list.rows()) {
            output.kv(&kind.to_string(), &count.to_string());
        }
        output.kv("total", &format!("{:.2} EUR", payment_total(list.rows())));
    }
    Ok(())
}

async fn documents(ctx: &AppContext, cmd: DocumentCommands, output: &Output) -> Result<()> {
    const COLUMNS: [&str; 6] = ["ID", "Name", "Type", "Size", "Uploaded", "Description"];

    match cmd {
        DocumentCommands::List { scope } => {
            let mut list = scoped_list(ctx, ctx.services.documents.clone(), &scope, output).await?;
            output.header("Documents");
            let rows = list.rows().iter().map(document_row).collect();
            render_state(&mut list, rows, &COLUMNS, output)
        }
        DocumentCommands::Upload {
            scope,
            file,
            description,
        } => {
            let mut list = scoped_list(ctx, ctx.services.documents.clone(), &scope, output).await?;
            let upload = DocumentUpload {
                file: UploadFile::from_path(&file)?,
                description,
            };
            let result = list.create(&upload).await;
            let created = with_banner(&list, result, output)?;
            output.success(&format!(
                "Document #{} uploaded ({})",
                id_or_dash(created.id),
                created.name.as_deref().unwrap_or(&upload.file.file_name)
            ));
            Ok(())
        }
        DocumentCommands::Download { id, output: path } => {
            let bytes = ctx.services.documents.download(id).await?;
            std::fs::write(&path, &bytes)?;
            output.created("document", &path.display().to_string());
            Ok(())
        }
        DocumentCommands::Update {
            scope,
            id,
            name,
            description,
        } => {
            let mut list = scoped_list(ctx, ctx.services.documents.clone(), &scope, output).await?;
            let patch = DocumentPatch {
                name,
                description,
                ..Default::default()
            };
            let result = list.update(id, &patch).await;
            with_banner(&list, result, output)?;
            output.success(&format!("Document #{} updated", id));
            Ok(())
        }
        DocumentCommands::Delete { scope, id, yes } => {
            let mut list = scoped_list(ctx, ctx.services.documents.clone(), &scope, output).await?;
            let deleted = list.delete(id, confirmer(yes, output)).await;
            report_delete(&list, deleted, id, output)
        }
    }
}

// ============= Selector, Reporting, Assistant =============

async fn select(ctx: &AppContext, filter: &str, output: &Output) -> Result<()> {
    let mut selector = CaseSelector::new(ctx.services.cases.clone());
    if let Err(e) = selector.load().await {
        output.banner(&e.banner("load cases"));
        return Err(e);
    }
    selector.set_filter(filter);

    let rows: Vec<Vec<String>> = selector
        .options()
        .into_iter()
        .map(|case| vec![id_or_dash(case.id), case_label(case)])
        .collect();

    output.header("Matching cases");
    if rows.is_empty() {
        output.info(&format!("No case matches '{}'", selector.filter()));
    } else {
        output.table(&["ID", "Case"], &rows);
    }
    Ok(())
}

async fn stats(ctx: &AppContext, monthly: bool, output: &Output) -> Result<()> {
    let stats = ctx.services.reporting.dashboard_stats().await?;

    output.header("Dashboard");
    output.kv("cases", &stats.total_cases.to_string());
    output.kv("in progress", &stats.cases_in_progress.to_string());
    output.kv(
        "validated",
        &format!("{} ({:.1} %)", stats.cases_validated, stats.validation_rate()),
    );
    output.kv(
        "rejected",
        &format!("{} ({:.1} %)", stats.cases_rejected, stats.rejection_rate()),
    );
    output.kv("careers", &stats.total_careers.to_string());
    output.kv("average salary", &format!("{:.2} EUR", stats.average_salary));
    output.kv("payments", &stats.total_payments.to_string());
    output.kv(
        "paid in total",
        &format!("{:.2} EUR", stats.total_payment_amount),
    );
    output.kv("documents", &stats.total_documents.to_string());

    if monthly {
        let monthly = ctx.services.reporting.monthly_stats().await?;
        output.subheader("Cases per month");
        let rows: Vec<Vec<String>> = monthly
            .cases_by_month
            .iter()
            .map(|(month, count)| vec![month.clone(), count.to_string()])
            .collect();
        output.table(&["Month", "Cases"], &rows);
    }
    Ok(())
}

async fn chat(ctx: &AppContext, message: Vec<String>, output: &Output) -> Result<()> {
    let mut assistant = Assistant::new(ctx.services.clone());

    if !message.is_empty() {
        let reply = assistant.send(&message.join(" ")).await;
        output.block(&reply.body.to_string());
        return Ok(());
    }

    for entry in assistant.transcript() {
        if entry.sender == Sender::Assistant {
            output.block(&entry.body.to_string());
        }
    }

    converse(&mut assistant, BufReader::new(tokio::io::stdin()), output).await
}

/// Answer each non-blank line of `input` until `exit`, `quit` or end of input.
async fn converse<R: AsyncBufRead + Unpin>(
    assistant: &mut Assistant,
    input: R,
    output: &Output,
) -> Result<()> {
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }
        let reply = assistant.send(line).await;
        output.newline();
        output.block(&reply.body.to_string());
    }
    Ok(())
}

// ============= Rendering Helpers =============

fn confirmer<'a>(yes: bool, output: &'a Output) -> &'a dyn Confirm {
    if yes {
        &AlwaysConfirm
    } else {
        output
    }
}

/// Show the view's banner when `result` failed, then pass it through.
fn with_banner<R: ScopedResource, T>(
    list: &ScopedList<R>,
    result: Result<T>,
    output: &Output,
) -> Result<T> {
    if result.is_err() {
        if let Some(banner) = list.banner() {
            output.banner(banner);
        }
    }
    result
}

fn report_delete<R: ScopedResource>(
    list: &ScopedList<R>,
    result: Result<bool>,
    id: i64,
    output: &Output,
) -> Result<()> {
    if with_banner(list, result, output)? {
        output.success(&format!("Deleted {} #{}", R::NAME, id));
    } else {
        output.info("Cancelled");
    }
    Ok(())
}

fn render_state<R: ScopedResource>(
    list: &mut ScopedList<R>,
    rows: Vec<Vec<String>>,
    columns: &[&str],
    output: &Output,
) -> Result<()> {
    match list.state().clone() {
        ViewState::NoSelection => {
            output.info("Please select a case first (--case <id> or --search <text>)");
            Ok(())
        }
        ViewState::Loading => Ok(()),
        ViewState::Error(banner) => {
            output.banner(&banner);
            Err(list.take_error().unwrap_or(AppError::Network(banner)))
        }
        ViewState::Loaded if rows.is_empty() => {
            output.info(&format!("No {}s", R::NAME));
            Ok(())
        }
        ViewState::Loaded => {
            output.table(columns, &rows);
            Ok(())
        }
    }
}

fn case_row(case: &Case) -> Vec<String> {
    vec![
        id_or_dash(case.id),
        case.social_security_number.clone(),
        case.beneficiary_name(),
        case.status.to_string(),
        date_or_dash(case.created_on),
    ]
}

fn career_row(career: &Career) -> Vec<String> {
    vec![
        id_or_dash(career.id),
        career.employer.clone(),
        career.role.clone(),
        career.start_date.to_string(),
        career
            .end_date
            .map_or_else(|| "ongoing".to_string(), |d| d.to_string()),
        format!("{:.2}", career.average_salary),
        career.regime.to_string(),
        career
            .validated_quarters
            .map_or_else(|| "-".to_string(), |q| q.to_string()),
    ]
}

fn payment_row(payment: &Payment) -> Vec<String> {
    vec![
        id_or_dash(payment.id),
        payment.disbursement_date.to_string(),
        format!("{:.2}", payment.amount),
        payment.payment_type.to_string(),
        payment.status.to_string(),
        payment.reference.clone().unwrap_or_else(|| "-".to_string()),
    ]
}

fn document_row(document: &Document) -> Vec<String> {
    vec![
        id_or_dash(document.id),
        document.name.clone().unwrap_or_else(|| "-".to_string()),
        document.mime_type.clone().unwrap_or_else(|| "-".to_string()),
        document
            .size
            .map_or_else(|| "-".to_string(), human_size),
        document
            .uploaded_at
            .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d %H:%M").to_string()),
        document.description.clone().unwrap_or_else(|| "-".to_string()),
    ]
}

fn human_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    match bytes {
        b if b < KB => format!("{} B", b),
        b if b < KB * KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{:.1} MB", b as f64 / (KB * KB) as f64),
    }
}

fn id_or_dash(id: Option<i64>) -> String {
    id.map_or_else(|| "-".to_string(), |id| id.to_string())
}

fn date_or_dash(date: Option<chrono::NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.format("%d/%m/%Y").to_string())
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, Services};
    use crate::assistant::Reply;
    use crate::auth::{MemoryTokenStore, RecordingNavigator};
    use crate::types::{PaymentStatus, PaymentType, PensionRegime};
    use chrono::NaiveDate;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_converse_stops_at_exit() {
        let client = ApiClient::new(
            "http://127.0.0.1:9/api",
            "http://127.0.0.1:9/login",
            Arc::new(MemoryTokenStore::new()),
            Arc::new(RecordingNavigator::new()),
        )
        .expect("client");
        let services = Services::new(Arc::new(client));
        let mut assistant = Assistant::new(services);
        let input: &[u8] = b"hello\n\n  merci  \nexit\nhelp\n";

        converse(&mut assistant, input, &Output::no_color())
            .await
            .expect("conversation");

        // greeting, then two exchanges; blank lines are skipped and nothing after exit is read
        let transcript = assistant.transcript();
        assert_eq!(transcript.len(), 5);
        assert_eq!(transcript[3].body, Reply::Text("merci".to_string()));
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_career_row_marks_ongoing() {
        let career = Career {
            id: Some(4),
            employer: "Renault".to_string(),
            role: "Technicien".to_string(),
            start_date: NaiveDate::from_ymd_opt(1990, 9, 1).expect("date"),
            end_date: None,
            average_salary: 32000.0,
            regime: PensionRegime::General,
            validated_quarters: Some(80),
            case_id: Some(1),
        };
        let row = career_row(&career);
        assert_eq!(row[4], "ongoing");
        assert_eq!(row[5], "32000.00");
        assert_eq!(row[7], "80");
    }

    #[test]
    fn test_payment_row_defaults() {
        let payment = Payment {
            id: None,
            amount: 1250.5,
            disbursement_date: NaiveDate::from_ymd_opt(2024, 1, 31).expect("date"),
            execution_date: None,
            payment_type: PaymentType::Allocation,
            reference: None,
            status: PaymentStatus::Pending,
            case_id: None,
        };
        assert_eq!(
            payment_row(&payment),
            vec!["-", "2024-01-31", "1250.50", "allocation", "pending", "-"]
        );
    }

    #[test]
    fn test_date_and_blank_helpers() {
        assert_eq!(
            date_or_dash(NaiveDate::from_ymd_opt(2023, 3, 5)),
            "05/03/2023"
        );
        assert_eq!(date_or_dash(None), "-");
        assert_eq!(or_dash("  "), "-");
        assert_eq!(or_dash("a@b.c"), "a@b.c");
    }
}
