//! # Dexhand Node
//!
//! 灵巧手控制循环节点。当前只带 sim（mock）总线传输：真实设备驱动
//! 由集成方实现 `BusTransport` 后自行接线，本二进制用于验证整条
//! 控制回路的接线和时序行为。
//!
//! ```bash
//! # 标称 1 kHz sim 运行，Ctrl-C 退出
//! dexhand-node --sim
//!
//! # 指定配置文件和 tick 预算
//! dexhand-node --sim --config node.toml --ticks 10000
//! ```

mod config;

use anyhow::{Result, bail};
use clap::Parser;
use config::NodeConfig;
use dexhand_bus::MockBus;
use dexhand_control::{CommandInbox, ControlCycle, LatestState, LoopConfig, ZeroTorque, run};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Dexhand 控制循环节点
#[derive(Parser, Debug)]
#[command(name = "dexhand-node")]
#[command(about = "Fixed-rate control loop node for the dexhand actuator", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML 配置文件路径
    #[arg(long)]
    config: Option<PathBuf>,

    /// 控制频率（Hz，覆盖配置文件）
    #[arg(long)]
    frequency: Option<f64>,

    /// 最大 tick 次数（覆盖配置文件）
    #[arg(long)]
    ticks: Option<u64>,

    /// 使用 sim（mock）总线运行
    #[arg(long)]
    sim: bool,
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dexhand_node=info".parse().unwrap())
                .add_directive("dexhand_control=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    if !cli.sim {
        bail!(
            "no hardware transport is built into this binary; \
             run with --sim, or wire a real BusTransport implementation"
        );
    }

    let mut node_config = match &cli.config {
        Some(path) => NodeConfig::load(path)?,
        None => NodeConfig::default(),
    };
    if let Some(frequency) = cli.frequency {
        node_config.frequency_hz = frequency;
    }
    if let Some(ticks) = cli.ticks {
        node_config.max_ticks = Some(ticks);
    }

    // Ctrl-C 优雅退出
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_handler = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        shutdown_handler.store(true, Ordering::Relaxed);
    })?;

    // 接线：信箱 + 最新状态观察者 + sim 总线 + 零力矩策略
    let inbox = Arc::new(CommandInbox::new());
    let publisher = LatestState::new();
    let observer = publisher.observer();

    let mut cycle = ControlCycle::new(MockBus::new(), ZeroTorque, publisher, Arc::clone(&inbox))?;

    let loop_config = LoopConfig {
        frequency_hz: node_config.frequency_hz,
        max_ticks: node_config.max_ticks,
    };

    info!(
        frequency_hz = loop_config.frequency_hz,
        ticks = ?loop_config.max_ticks,
        "dexhand node starting (sim transport)"
    );

    run(&mut cycle, &loop_config, &shutdown)?;

    let latest = observer.latest();
    info!(
        frames = cycle.frame(),
        last_status = cycle.last_status().code(),
        stamped = latest.stamp.is_some(),
        "dexhand node stopped"
    );
    Ok(())
}
