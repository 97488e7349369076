use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::info;
use tame::{
    TameResult,
    backend::Backend,
    model::{Application, Expr, OperationRegistry, Operator, Symbol},
    types::{TypeDecl, TypeRegistry},
};
use tame_api::{Prelude, ascii, c::CBackend};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(about = "Walk through the tame type algebra and its C backend")]
struct Arguments {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Define a generic array type and an access operation over it
    Types,
    /// Build and render arithmetic and indexing expressions in C
    Expression {
        /// Number of items of the demo array
        #[arg(long, default_value_t = 10)]
        length: u64,
        /// Position read from the demo array
        #[arg(long, default_value_t = 5)]
        position: u64,
    },
    /// Print the builtin type graph by rank
    Graph,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,tame=info"));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn types() -> TameResult<()> {
    let types = Arc::new(TypeRegistry::new());
    let array = types.create_type(TypeDecl::new("Array").generic("T"))?;
    let item = types
        .parameter(array, "T")
        .ok_or(tame::Error::UnknownType { ty: array })?;
    println!("{}", types.fmt(array));
    println!("{}", types.fmt(item));

    // `Array` and its item placeholder share no ancestor, so the result type is given explicitly.
    let operations = OperationRegistry::new(types.clone());
    let access = operations.declare(Operator::Access, [array, item], item)?;
    println!("{} -> {}", access.signature().fmt(&types), types.fmt(access.ty()));
    Ok(())
}

fn expression(length: u64, position: u64) -> TameResult<()> {
    let prelude = Prelude::new()?;
    let c = CBackend::new(prelude.types().clone());

    let sum = Expr::from(Application::add(prelude.int(10), prelude.int(20)));
    println!("{}", c.render(&sum)?.into_string());

    let array = prelude.literal_array(&prelude.int(0), length)?;
    let symbol = Symbol::new("array_a", array.value);
    info!("array_a is {} bits wide", array.size());

    print!("{}", c.declare(&symbol, &Expr::from(array))?.into_string());
    println!("{}", prelude.types().qualified_name(symbol.value.ty).unwrap_or_default());

    let read = Expr::from(Application::index(symbol, prelude.int(position)));
    print!("{}", c.statement(&read)?.into_string());
    Ok(())
}

fn graph() -> TameResult<()> {
    let prelude = Prelude::new()?;
    prelude.array_of(prelude.natural())?;
    prelude.array_of(prelude.decimal())?;
    println!("{}", ascii::registry_to_ascii(prelude.types()));
    Ok(())
}

fn main() -> TameResult<()> {
    init_logging();
    let args = Arguments::parse();

    match args.command {
        Command::Types => types(),
        Command::Expression { length, position } => expression(length, position),
        Command::Graph => graph(),
    }
}
