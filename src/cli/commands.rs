//! Command dispatch: one handler per subcommand.
//!
//! Pack commands are stateless across invocations: each one opens the pack
//! file, applies a single tracker operation, saves and reports.

use std::cell::Cell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::CommandFactory;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::report::{catalog_line, fit_lines, packed_lines};
use crate::application::services::{FitSource, SessionService};
use crate::application::{ApplicationError, Language};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{Aggregate, Catalog};
use crate::exitcode;
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Everything a handler needs.
pub struct Context {
    pub container: ServiceContainer,
    pub language: Language,
}

impl Context {
    pub fn new(container: ServiceContainer, language: Option<Language>) -> Self {
        let language = language.unwrap_or(container.settings.language);
        Self {
            container,
            language,
        }
    }

    fn catalog(&self) -> CliResult<Catalog> {
        Ok(self
            .container
            .catalog_service()
            .load_catalog(self.container.settings.catalog.as_deref())?)
    }
}

/// Load settings and run the parsed command. Returns the process exit code.
pub fn execute_command(cli: &Cli) -> CliResult<i32> {
    let settings = Settings::load()?;
    let ctx = Context::new(ServiceContainer::new(settings), cli.lang);
    run(cli, &ctx)
}

/// Run the parsed command against an existing context.
pub fn run(cli: &Cli, ctx: &Context) -> CliResult<i32> {
    match &cli.command {
        Some(Commands::New {
            file,
            max_weight,
            max_volume,
            force,
        }) => cmd_new(ctx, file, *max_weight, *max_volume, *force),
        Some(Commands::Show { file, check }) => cmd_show(ctx, file, *check),
        Some(Commands::Add {
            file,
            name,
            weight,
            volume,
        }) => cmd_add(ctx, file, name, *weight, *volume),
        Some(Commands::Pick {
            file,
            category,
            item,
        }) => cmd_pick(ctx, file, category, item),
        Some(Commands::Edit {
            file,
            name,
            rename,
            weight,
            volume,
        }) => cmd_edit(ctx, file, name, rename.as_deref(), *weight, *volume),
        Some(Commands::Remove { file, name }) => cmd_remove(ctx, file, name),
        Some(Commands::Clear { file }) => cmd_clear(ctx, file),
        Some(Commands::Budget {
            file,
            max_weight,
            max_volume,
        }) => cmd_budget(ctx, file, *max_weight, *max_volume),
        Some(Commands::SaveAs { file, target }) => cmd_save_as(ctx, file, target),
        Some(Commands::Catalog { category }) => cmd_catalog(ctx, category.as_deref()),
        Some(Commands::Fit {
            kg,
            category,
            catalog,
        }) => cmd_fit(ctx, *kg, category.as_deref(), catalog.as_deref()),
        Some(Commands::Config { command }) => cmd_config(ctx, command),
        Some(Commands::About) => cmd_about(),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "bpcalc", &mut io::stdout());
            Ok(exitcode::OK)
        }
        None => {
            Cli::command()
                .print_help()
                .map_err(|e| InfraError::io("print help", e))?;
            Ok(exitcode::OK)
        }
    }
}

/// Open `file`, apply `op`, save, then print the new state if anything changed.
fn mutate(
    ctx: &Context,
    file: &Path,
    op: impl FnOnce(&mut SessionService) -> CliResult<()>,
) -> CliResult<i32> {
    let mut session = ctx.container.session()?;
    session.open(file)?;

    let latest: Rc<Cell<Option<Aggregate>>> = Rc::new(Cell::new(None));
    let sink = Rc::clone(&latest);
    session.subscribe(move |agg: &Aggregate| sink.set(Some(*agg)));

    op(&mut session)?;

    match latest.get() {
        Some(aggregate) => {
            let path = session.save()?;
            debug!("saved {}", path.display());
            output::summary(&aggregate, ctx.language);
            output::gauges(&aggregate, ctx.language);
        }
        None => debug!("no change, {} left untouched", file.display()),
    }
    Ok(exitcode::OK)
}

#[instrument(skip(ctx))]
fn cmd_new(
    ctx: &Context,
    file: &Path,
    max_weight: Option<u32>,
    max_volume: Option<f64>,
    force: bool,
) -> CliResult<i32> {
    let target = crate::application::services::with_pack_extension(file);
    if ctx.container.fs.exists(&target) && !force {
        return Err(CliError::Usage(format!(
            "{} already exists (use --force to overwrite)",
            target.display()
        )));
    }

    let mut session = ctx.container.session()?;
    let budget = session.tracker().budget();
    session.set_budget(
        max_weight.unwrap_or(budget.max_weight_kg),
        max_volume.unwrap_or(budget.max_volume),
    )?;
    let path = session.save_as(&target)?;

    let budget = session.tracker().budget();
    output::success(&format!(
        "Created {} ({} kg, {} l)",
        path.display(),
        budget.max_weight_kg,
        budget.max_volume
    ));
    Ok(exitcode::OK)
}

#[instrument(skip(ctx))]
fn cmd_show(ctx: &Context, file: &Path, check: bool) -> CliResult<i32> {
    let mut session = ctx.container.session()?;
    session.open(file)?;
    let aggregate = session.aggregate();

    output::header(&session.title());
    if session.tracker().is_empty() {
        output::info(match ctx.language {
            Language::Ru => "Рюкзак пуст",
            Language::En => "Nothing packed yet",
        });
    } else {
        for line in packed_lines(session.tracker().items(), ctx.language) {
            output::detail(&line);
        }
        output::summary(&aggregate, ctx.language);
    }
    output::gauges(&aggregate, ctx.language);

    if check && aggregate.any_over_limit() {
        return Ok(exitcode::OVER_LIMIT);
    }
    Ok(exitcode::OK)
}

#[instrument(skip(ctx))]
fn cmd_add(ctx: &Context, file: &Path, name: &str, weight: u32, volume: f64) -> CliResult<i32> {
    mutate(ctx, file, |session| {
        session.add_item(name, weight, volume)?;
        output::action("Added", name.trim());
        Ok(())
    })
}

#[instrument(skip(ctx))]
fn cmd_pick(ctx: &Context, file: &Path, category: &str, item: &str) -> CliResult<i32> {
    let catalog = ctx.catalog()?;
    mutate(ctx, file, |session| {
        if session.add_preset(&catalog, category, item)? {
            output::action("Added", item.trim());
        } else {
            output::warning(&format!("{} is already packed", item.trim()));
        }
        Ok(())
    })
}

#[instrument(skip(ctx))]
fn cmd_edit(
    ctx: &Context,
    file: &Path,
    name: &str,
    rename: Option<&str>,
    weight: Option<u32>,
    volume: Option<f64>,
) -> CliResult<i32> {
    mutate(ctx, file, |session| {
        // a missing item is reported by the tracker, after the new name is checked
        let current = session.tracker().get(name).copied();
        let new_name = rename.unwrap_or(name);
        session.edit_item(
            name,
            new_name,
            weight.or(current.map(|i| i.weight)).unwrap_or_default(),
            volume.or(current.map(|i| i.volume)).unwrap_or_default(),
        )?;
        output::action("Updated", new_name.trim());
        Ok(())
    })
}

#[instrument(skip(ctx))]
fn cmd_remove(ctx: &Context, file: &Path, name: &str) -> CliResult<i32> {
    mutate(ctx, file, |session| {
        let item = session.remove_item(name)?;
        output::action(
            "Removed",
            &format!("{} ({} g, {} l)", name.trim(), item.weight, item.volume),
        );
        Ok(())
    })
}

#[instrument(skip(ctx))]
fn cmd_clear(ctx: &Context, file: &Path) -> CliResult<i32> {
    mutate(ctx, file, |session| {
        let count = session.tracker().len();
        session.clear();
        output::action("Cleared", &format!("{count} items"));
        Ok(())
    })
}

#[instrument(skip(ctx))]
fn cmd_budget(
    ctx: &Context,
    file: &Path,
    max_weight: Option<u32>,
    max_volume: Option<f64>,
) -> CliResult<i32> {
    if max_weight.is_none() && max_volume.is_none() {
        return Err(CliError::InvalidArgs(
            "give --max-weight and/or --max-volume".into(),
        ));
    }
    mutate(ctx, file, |session| {
        let budget = session.tracker().budget();
        let weight = max_weight.unwrap_or(budget.max_weight_kg);
        let volume = max_volume.unwrap_or(budget.max_volume);
        session.set_budget(weight, volume)?;
        output::action("Budget", &format!("{weight} kg, {volume} l"));
        Ok(())
    })
}

#[instrument(skip(ctx))]
fn cmd_save_as(ctx: &Context, file: &Path, target: &Path) -> CliResult<i32> {
    let mut session = ctx.container.session()?;
    session.open(file)?;
    let path = session.save_as(target)?;
    output::success(&format!("Saved {}", path.display()));
    Ok(exitcode::OK)
}

#[instrument(skip(ctx))]
fn cmd_catalog(ctx: &Context, category: Option<&str>) -> CliResult<i32> {
    let catalog = ctx.catalog()?;
    let groups: Vec<_> = match category {
        Some(name) => vec![catalog
            .category(name)
            .ok_or_else(|| ApplicationError::UnknownCategory(name.trim().to_string()))?],
        None => catalog.categories().iter().collect(),
    };

    let root = match ctx.language {
        Language::Ru => "Каталог",
        Language::En => "Catalog",
    };
    let tree = Tree::new(root.to_string()).with_leaves(groups.into_iter().map(|group| {
        Tree::new(group.name.clone()).with_leaves(
            group
                .items
                .iter()
                .map(|item| catalog_line(item, ctx.language)),
        )
    }));
    output::info(&tree);
    Ok(exitcode::OK)
}

#[instrument(skip(ctx))]
fn cmd_fit(
    ctx: &Context,
    kg: u32,
    category: Option<&str>,
    catalog: Option<&Path>,
) -> CliResult<i32> {
    let settings = &ctx.container.settings;
    let source = match category {
        Some(name) => FitSource::Category {
            catalog: catalog.map(Path::to_path_buf).or_else(|| settings.catalog.clone()),
            name: name.to_string(),
        },
        None => FitSource::TrailKit(
            catalog
                .map(Path::to_path_buf)
                .or_else(|| settings.fit_catalog.clone()),
        ),
    };

    let outcome = ctx.container.catalog_service().fit(&source, kg)?;
    for line in fit_lines(&outcome, ctx.language) {
        output::info(&line);
    }
    Ok(exitcode::OK)
}

#[instrument(skip(ctx))]
fn cmd_config(ctx: &Context, command: &ConfigCommands) -> CliResult<i32> {
    match command {
        ConfigCommands::Show => {
            output::info(&ctx.container.settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("cannot determine config directory"),
        },
        ConfigCommands::Init { force } => {
            let path: PathBuf = global_config_path().ok_or_else(|| ApplicationError::Config {
                message: "cannot determine config directory".into(),
            })?;
            let fs = &ctx.container.fs;
            if fs.exists(&path) && !force {
                return Err(CliError::Usage(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            fs.ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
            fs.write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("Created {}", path.display()));
        }
    }
    Ok(exitcode::OK)
}

fn cmd_about() -> CliResult<i32> {
    output::header(&format!("Backpack calculator v{}", env!("CARGO_PKG_VERSION")));
    output::info("");
    output::info("Calculates the weight and volume of the gear in a backpack.");
    output::info("Add items by hand or pick them from the preset gear catalog.");
    output::info("");
    output::info("© 2025 Himaltrex");
    output::info("http://www.himaltrex.ru");
    Ok(exitcode::OK)
}
