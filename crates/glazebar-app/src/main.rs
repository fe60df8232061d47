use std::{backtrace::Backtrace, num::NonZeroUsize, panic, path::PathBuf, sync::Arc};

use clap::{Parser, command};
use flexi_logger::{Age, Cleanup, Criterion, FileSpec, LogSpecBuilder, Logger, Naming};
use glazebar_core::{
    HEIGHT, ProviderContext, adapters::glazewm_client::GlazewmClient, config::get_config,
    event_bus::EventBus, providers::ProviderGroup,
};
use glazebar_gui::{App, get_log_spec};
use glazebar_proto::{config::Position, ports::glazewm::GlazewmPort};
use iced::{Point, Size, window};
use log::{debug, error};

const EVENT_BUS_CAPACITY: usize = 64;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_parser = clap::value_parser!(PathBuf))]
    config_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> iced::Result {
    let args = Args::parse();
    debug!("args: {args:?}");

    let logger = Logger::with(
        LogSpecBuilder::new()
            .default(log::LevelFilter::Info)
            .build(),
    )
    .log_to_file(FileSpec::default().directory("/tmp/glazebar"))
    .duplicate_to_stdout(flexi_logger::Duplicate::All)
    .rotate(
        Criterion::Age(Age::Day),
        Naming::Timestamps,
        Cleanup::KeepLogFiles(7),
    );
    let logger = logger.start().unwrap();

    panic::set_hook(Box::new(|info| {
        let b = Backtrace::capture();
        error!("Panic: {info} \n {b}");
    }));

    let (config, config_path) = get_config(args.config_path).unwrap_or_else(|err| {
        error!("Failed to read config: {err}");

        std::process::exit(1);
    });
    debug!("config loaded from {config_path:?}");

    logger.set_new_spec(get_log_spec(config.log_level));

    let port: Arc<dyn GlazewmPort> =
        Arc::new(GlazewmClient::new(config.glazewm.command.as_str()));

    let bus = EventBus::new(NonZeroUsize::new(EVENT_BUS_CAPACITY).expect("non-zero capacity"));
    let ctx = ProviderContext::new(bus.sender(), tokio::runtime::Handle::current());

    // The group owns the provider tasks; it must outlive the UI loop.
    let mut providers = ProviderGroup::new(Arc::clone(&port), config.clone());
    providers.register(&ctx);

    iced::application(App::title, App::update, App::view)
        .subscription(App::subscription)
        .theme(App::theme)
        .window(window::Settings {
            position: match config.position {
                Position::Top => window::Position::SpecificWith(|_, _| Point::ORIGIN),
                Position::Bottom => window::Position::SpecificWith(|window, monitor| {
                    Point::new(0.0, monitor.height - window.height)
                }),
            },
            decorations: false,
            resizable: false,
            ..window::Settings::default()
        })
        .window_size(Size::new(1280.0, HEIGHT as f32))
        .run_with(App::new((config, port, bus.receiver())))
}
