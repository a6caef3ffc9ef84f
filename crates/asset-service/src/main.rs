//! `assetctl`: command line front end for the asset tracker workbook

use anyhow::{bail, Context};
use asset_core::{AssetFields, Column, Dimensions, DropdownField, RowRef, Status};
use asset_service::{AssetService, LogMessenger, OperationResult};
use asset_store::{EngineConfig, RecordStore, Workbook};
use chrono::NaiveDate;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn row_arg() -> Arg {
    Arg::new("row")
        .long("row")
        .required(true)
        .value_parser(value_parser!(u32).range(2..))
        .help("Sheet row of the record (first record is row 2)")
}

fn field_args(required: bool) -> Vec<Arg> {
    vec![
        Arg::new("name").long("name").required(required).help("Asset name"),
        Arg::new("material").long("material").required(required).help("Material"),
        Arg::new("quantity")
            .long("quantity")
            .required(required)
            .value_parser(value_parser!(u32))
            .help("Quantity"),
        Arg::new("area").long("area").help("Area"),
        Arg::new("item").long("item").help("Item kind"),
        Arg::new("venue").long("venue").help("Venue"),
        Arg::new("location").long("location").help("Location within the venue"),
        Arg::new("dimensions")
            .long("dimensions")
            .value_parser(value_parser!(Dimensions))
            .help("Width x height in inches, e.g. 36x72"),
        Arg::new("due")
            .long("due")
            .value_parser(value_parser!(NaiveDate))
            .help("Due date (YYYY-MM-DD)"),
        Arg::new("strike")
            .long("strike")
            .value_parser(value_parser!(NaiveDate))
            .help("Strike date (YYYY-MM-DD)"),
        Arg::new("artwork").long("artwork").help("Artwork reference"),
        Arg::new("image").long("image").help("Image link"),
        Arg::new("double-sided")
            .long("double-sided")
            .value_parser(value_parser!(bool))
            .help("Printed on both sides"),
        Arg::new("die-cut")
            .long("die-cut")
            .value_parser(value_parser!(bool))
            .help("Die cut"),
        Arg::new("production-status")
            .long("production-status")
            .help("Production status"),
    ]
}

fn cli() -> Command {
    Command::new("assetctl")
        .version(asset_service::VERSION)
        .about("Signage asset tracker")
        .subcommand_required(true)
        .arg(
            Arg::new("workbook")
                .long("workbook")
                .short('w')
                .global(true)
                .default_value("assets.json")
                .value_parser(value_parser!(PathBuf))
                .help("Workbook file"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Engine configuration (TOML)"),
        )
        .arg(
            Arg::new("recipient")
                .long("recipient")
                .global(true)
                .action(ArgAction::Append)
                .help("Attention notification recipient"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log as JSON lines"),
        )
        .subcommand(
            Command::new("init")
                .about("Provision an empty workbook")
                .arg(
                    Arg::new("force")
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Overwrite an existing workbook"),
                ),
        )
        .subcommand(
            Command::new("add")
                .about("Create an asset")
                .args(field_args(true)),
        )
        .subcommand(
            Command::new("edit")
                .about("Edit an asset; omitted fields keep their value")
                .arg(row_arg())
                .args(field_args(false))
                .arg(Arg::new("status").long("status").help("Status"))
                .arg(Arg::new("comment").long("comment").help("Attention comment")),
        )
        .subcommand(
            Command::new("set-status")
                .about("Change the status of an asset")
                .arg(row_arg())
                .arg(Arg::new("status").required(true).help("New status"))
                .arg(Arg::new("comment").long("comment").help("Attention comment")),
        )
        .subcommand(
            Command::new("cell")
                .about("Write one cell as a direct table edit")
                .arg(row_arg())
                .arg(Arg::new("column").required(true).help("Column header"))
                .arg(Arg::new("value").required(true).help("Cell text")),
        )
        .subcommand(
            Command::new("reorder")
                .about("Reorder an asset under a new identifier")
                .arg(row_arg())
                .arg(
                    Arg::new("quantity")
                        .long("quantity")
                        .required(true)
                        .value_parser(value_parser!(u32))
                        .help("Quantity of the new order"),
                ),
        )
        .subcommand(Command::new("show").about("Show one asset").arg(row_arg()))
        .subcommand(Command::new("list").about("List assets in display order"))
        .subcommand(
            Command::new("dropdown")
                .about("Manage dropdown lists")
                .subcommand_required(true)
                .subcommand(
                    Command::new("list")
                        .about("List values")
                        .arg(Arg::new("field").required(true)),
                )
                .subcommand(
                    Command::new("add")
                        .about("Add a value")
                        .arg(Arg::new("field").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(
                    Command::new("rename")
                        .about("Rename a value")
                        .arg(Arg::new("field").required(true))
                        .arg(Arg::new("old").required(true))
                        .arg(Arg::new("new").required(true)),
                )
                .subcommand(
                    Command::new("delete")
                        .about("Delete a value")
                        .arg(Arg::new("field").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(
            Command::new("attention")
                .about("Send the attention notification for an asset")
                .arg(row_arg())
                .arg(
                    Arg::new("comment")
                        .long("comment")
                        .required(true)
                        .help("What needs attention"),
                ),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn string_arg(args: &ArgMatches, name: &str) -> Option<String> {
    args.try_get_one::<String>(name).ok().flatten().cloned()
}

fn row(args: &ArgMatches) -> anyhow::Result<RowRef> {
    args.get_one::<u32>("row")
        .map(|r| RowRef::new(*r))
        .context("missing --row")
}

fn field(args: &ArgMatches) -> anyhow::Result<DropdownField> {
    let name = args.get_one::<String>("field").context("missing field")?;
    Ok(name.parse()?)
}

/// Overlay the given flags on `fields`
fn apply_field_args(fields: &mut AssetFields, args: &ArgMatches) {
    let text = [
        ("name", &mut fields.asset_name),
        ("material", &mut fields.material),
        ("area", &mut fields.area),
        ("item", &mut fields.item),
        ("venue", &mut fields.venue),
        ("location", &mut fields.location),
        ("artwork", &mut fields.artwork_ref),
        ("image", &mut fields.image_ref),
        ("production-status", &mut fields.production_status),
    ];
    for (name, slot) in text {
        if let Some(value) = string_arg(args, name) {
            *slot = value;
        }
    }
    if let Some(quantity) = args.get_one::<u32>("quantity") {
        fields.quantity = Some(*quantity);
    }
    if let Some(dimensions) = args.get_one::<Dimensions>("dimensions") {
        fields.width = Some(dimensions.width);
        fields.height = Some(dimensions.height);
    }
    if let Some(date) = args.get_one::<NaiveDate>("due") {
        fields.due_date = Some(*date);
    }
    if let Some(date) = args.get_one::<NaiveDate>("strike") {
        fields.strike_date = Some(*date);
    }
    if let Some(flag) = args.get_one::<bool>("double-sided") {
        fields.double_sided = *flag;
    }
    if let Some(flag) = args.get_one::<bool>("die-cut") {
        fields.die_cut = *flag;
    }
    if let Some(status) = string_arg(args, "status") {
        fields.status = Some(Status::parse(&status));
    }
    fields.comment = string_arg(args, "comment");
}

/// Current form values of the record at `row`
async fn current_fields(service: &AssetService, row: RowRef) -> anyhow::Result<AssetFields> {
    let fetched = service.fetch(row).await;
    match fetched.payload {
        Some(rendered) => Ok(AssetFields::from_record(&rendered.record)),
        None => bail!(fetched.message),
    }
}

/// Print a result; `true` when it succeeded
fn report<T: Serialize>(result: &OperationResult<T>) -> anyhow::Result<bool> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(result.success)
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn init_workbook(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!("{} already exists; pass --force to overwrite", path.display());
    }
    Workbook::provision().save(path)?;
    tracing::info!(path = %path.display(), "workbook provisioned");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json-logs"));

    let workbook_path = matches
        .get_one::<PathBuf>("workbook")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("assets.json"));

    if let Some(("init", args)) = matches.subcommand() {
        return init_workbook(&workbook_path, args.get_flag("force"));
    }

    let config = load_config(matches.get_one::<PathBuf>("config"))?;
    let workbook = Workbook::load(&workbook_path)
        .with_context(|| format!("opening workbook {}", workbook_path.display()))?;
    let recipients: Vec<String> = matches
        .get_many::<String>("recipient")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let service = AssetService::new(
        RecordStore::from_workbook(workbook, config),
        Arc::new(LogMessenger::new(recipients)),
    );

    let (succeeded, mutated) = match matches.subcommand() {
        Some(("add", args)) => {
            let mut fields = AssetFields::default();
            apply_field_args(&mut fields, args);
            (report(&service.submit_new(fields).await)?, true)
        }
        Some(("edit", args)) => {
            let row = row(args)?;
            let mut fields = current_fields(&service, row).await?;
            apply_field_args(&mut fields, args);
            (report(&service.submit_edit(row, fields).await)?, true)
        }
        Some(("set-status", args)) => {
            let row = row(args)?;
            let mut fields = current_fields(&service, row).await?;
            fields.status = string_arg(args, "status").map(|s| Status::parse(&s));
            fields.comment = string_arg(args, "comment");
            (report(&service.submit_edit(row, fields).await)?, true)
        }
        Some(("cell", args)) => {
            let row = row(args)?;
            let column: Column = string_arg(args, "column").unwrap_or_default().parse()?;
            let value = string_arg(args, "value").unwrap_or_default();
            (report(&service.apply_cell_edit(row, column, &value).await)?, true)
        }
        Some(("reorder", args)) => {
            let row = row(args)?;
            let quantity = *args.get_one::<u32>("quantity").context("missing --quantity")?;
            (report(&service.reorder(row, quantity).await)?, true)
        }
        Some(("show", args)) => (report(&service.fetch(row(args)?).await)?, false),
        Some(("list", _)) => (report(&service.list().await)?, false),
        Some(("dropdown", sub)) => match sub.subcommand() {
            Some(("list", args)) => (report(&service.list_dropdown_values(field(args)?).await)?, false),
            Some(("add", args)) => {
                let value = string_arg(args, "value").unwrap_or_default();
                (report(&service.add_dropdown_value(field(args)?, &value).await)?, true)
            }
            Some(("rename", args)) => {
                let old = string_arg(args, "old").unwrap_or_default();
                let new = string_arg(args, "new").unwrap_or_default();
                (report(&service.update_dropdown_value(field(args)?, &old, &new).await)?, true)
            }
            Some(("delete", args)) => {
                let value = string_arg(args, "value").unwrap_or_default();
                (report(&service.delete_dropdown_value(field(args)?, &value).await)?, true)
            }
            _ => bail!("unknown dropdown command"),
        },
        Some(("attention", args)) => {
            let row = row(args)?;
            let comment = string_arg(args, "comment").unwrap_or_default();
            (report(&service.submit_attention_comment(row, &comment).await)?, true)
        }
        _ => bail!("unknown command"),
    };

    if mutated {
        service
            .workbook()
            .await
            .save(&workbook_path)
            .with_context(|| format!("saving workbook {}", workbook_path.display()))?;
    }
    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
