//! PathSim 命令行入口
//!
//! `run` 在随机生成的树状图上驱动一种逐步搜索算法到终态，
//! `geo` 在实景路网坐标上驱动地理 BFS。

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pathsim::config::Config;
use pathsim::geo::{GeoBfs, GeoNeighborResolver, GeoPoint, RoadsApiClient};
use pathsim::graph::{generate, BranchingConfig, Graph, NodeId};
use pathsim::services::engine::{
    AStarEngine, BestFirstEngine, BfsEngine, BidirectionalEngine, DfsEngine, DijkstraEngine,
    RandomWalkEngine,
};
use pathsim::services::{SearchSession, StepDriver, SteppedEngine};
use pathsim::utils;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "pathsim", version, about = "图搜索算法逐步模拟器")]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 在随机生成的图上运行一次逐步搜索
    Run {
        /// 搜索算法
        #[arg(value_enum)]
        algorithm: Algorithm,

        /// 随机种子，缺省使用系统熵
        #[arg(short, long)]
        seed: Option<u64>,

        /// 目标节点编号，可重复指定，缺省取编号最大的叶子节点
        #[arg(short, long)]
        target: Vec<NodeId>,
    },
    /// 在实景路网上运行地理 BFS
    Geo {
        /// 起点坐标，形如 "52.520008,13.404954"
        start: String,

        /// 目标坐标，同一格式
        end: String,

        /// 最大扩展步数
        #[arg(long, default_value_t = 200)]
        max_steps: u32,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    Bfs,
    Dfs,
    Dijkstra,
    Astar,
    BestFirst,
    Bidirectional,
    RandomWalk,
}

impl Algorithm {
    fn branching(self) -> BranchingConfig {
        match self {
            Algorithm::Bidirectional => BranchingConfig::four_level(),
            _ => BranchingConfig::three_level(),
        }
    }
}

fn build_engine(algorithm: Algorithm, graph: Graph, rng: StdRng, config: &Config) -> Box<dyn SteppedEngine> {
    match algorithm {
        Algorithm::Bfs => Box::new(BfsEngine::with_rng(graph, rng)),
        Algorithm::Dfs => Box::new(DfsEngine::with_rng(graph, rng)),
        Algorithm::Dijkstra => Box::new(DijkstraEngine::with_rng(graph, rng)),
        Algorithm::Astar => Box::new(AStarEngine::with_rng(graph, rng)),
        Algorithm::BestFirst => Box::new(BestFirstEngine::with_rng(graph, rng)),
        Algorithm::Bidirectional => Box::new(BidirectionalEngine::with_rng(graph, rng)),
        Algorithm::RandomWalk => {
            let mut engine = RandomWalkEngine::with_rng(graph, rng);
            engine.set_max_steps(config.search.random_walk_max_steps);
            Box::new(engine)
        }
    }
}

fn parse_point(text: &str) -> Result<GeoPoint> {
    let (lat, lng) = text
        .split_once(',')
        .ok_or_else(|| anyhow!("坐标格式应为 \"lat,lng\": {text}"))?;
    Ok(GeoPoint::new(
        lat.trim().parse().with_context(|| format!("纬度无法解析: {lat}"))?,
        lng.trim().parse().with_context(|| format!("经度无法解析: {lng}"))?,
    ))
}

async fn run_search(
    algorithm: Algorithm,
    seed: Option<u64>,
    targets: Vec<NodeId>,
    config: &Config,
) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let graph = generate(&algorithm.branching(), &mut rng);
    let node_count = graph.node_count();
    let mut engine = build_engine(algorithm, graph, rng, config);

    let targets = if targets.is_empty() {
        vec![node_count as NodeId]
    } else {
        targets
    };
    for target in targets {
        if target == 0 || target as usize > node_count {
            bail!("目标节点 {} 不在图中（共 {} 个节点）", target, node_count);
        }
        engine.select_target(target);
    }

    let session = Arc::new(SearchSession::new());
    session.set_speed(config.search.speed);
    spawn_cancel_on_ctrl_c(Arc::clone(&session));

    let driver = StepDriver::new(
        session,
        Duration::from_millis(config.search.step_delay_ms),
    );
    let state = driver
        .drive(engine.as_mut())
        .await
        .map_err(|e| anyhow!("搜索执行失败: {e}"))?;

    let snapshot = engine.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    log::info!("{:?} 搜索结束，最终状态 {:?}", algorithm, state);
    Ok(())
}

async fn run_geo(start: &str, end: &str, max_steps: u32, config: &Config) -> Result<()> {
    let origin = parse_point(start)?;
    let target = parse_point(end)?;
    if config.geo.api_key.is_empty() {
        log::warn!("未配置路网吸附服务密钥，外呼可能被拒绝");
    }

    let session = Arc::new(SearchSession::new());
    session.set_speed(config.search.speed);
    spawn_cancel_on_ctrl_c(Arc::clone(&session));

    let snapper = Arc::new(RoadsApiClient::new(&config.geo));
    let resolver = GeoNeighborResolver::new(snapper, session, config.geo.clone());
    let mut bfs = GeoBfs::new(resolver, origin, target);

    let state = bfs
        .run(max_steps)
        .await
        .map_err(|e| anyhow!("地理搜索执行失败: {e}"))?;
    println!("state: {:?}", state);
    println!("visited: {}", bfs.visited_order().len());
    match bfs.solution() {
        Some(path) => {
            for point in path {
                println!("{}", point.key());
            }
        }
        None => println!("{}", bfs.message()),
    }
    Ok(())
}

fn spawn_cancel_on_ctrl_c(session: Arc<SearchSession>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("收到中断信号，取消当前搜索");
            session.cancel();
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default(&cli.config);
    utils::logging::init(&config).map_err(|e| anyhow!("日志初始化失败: {e}"))?;

    let result = match cli.command {
        Commands::Run {
            algorithm,
            seed,
            target,
        } => run_search(algorithm, seed, target, &config).await,
        Commands::Geo {
            start,
            end,
            max_steps,
        } => run_geo(&start, &end, max_steps, &config).await,
    };

    utils::logging::shutdown();
    result
}
