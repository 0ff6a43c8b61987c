use bevy_ecs::prelude::*;
use std::sync::Arc;
use tech3c_bridge::config::BridgeConfig;
use tech3c_bridge::core::logging;
use tech3c_bridge::core::{process_main_thread_tasks_system, MainThreadQueueResource};
use tech3c_bridge::gateway::SessionGateway;
use tech3c_bridge::platform::inbound::{self, InboundEvent};
use tech3c_bridge::platform::HeadlessAdapter;
use tech3c_bridge::scene::LoginScene;

fn print_status(scene: Res<LoginScene>) {
    let view = scene.view();
    println!("[{:?}] {}", view.status_color, view.status);
    if !view.user_info.is_empty() {
        println!("{}", view.user_info);
    }
}

fn main() {
    let mut config = BridgeConfig::load_or_default();
    config.apply_env_overrides();
    logging::init(&config.logging);

    if let Err(e) = config.validate() {
        tracing::warn!(target: "tech3c", "{}, using demo credentials", e);
        config.credentials.client_id = "3cgame".to_string();
        config.credentials.client_secret = "demo-secret".to_string();
        config.auth = LoginScene::demo_config();
    }

    let queue = MainThreadQueueResource::default();
    let gateway = match SessionGateway::shared(
        Arc::new(HeadlessAdapter::new()),
        queue.queue.clone(),
    ) {
        Ok(gateway) => gateway,
        Err(e) => {
            eprintln!("Failed to create session gateway: {}", e);
            std::process::exit(1);
        }
    };

    let scene = LoginScene::attach(gateway.clone())
        .with_maintenance_ip(config.ip_maintenance_check.clone());
    scene.on_enter();
    if !scene.initialize_sdk(&config.credentials, &config.auth) {
        eprintln!("{}", scene.view().status);
        std::process::exit(1);
    }

    let mut world = World::default();
    world.insert_resource(queue);
    world.insert_resource(scene);
    let mut schedule = Schedule::default();
    schedule.add_systems((process_main_thread_tasks_system, print_status).chain());

    world.resource::<LoginScene>().on_login_clicked();
    schedule.run(&mut world);

    // 模拟 SDK 在后台线程上报登录结果
    let sdk_thread = std::thread::spawn(|| {
        inbound::deliver(InboundEvent::AuthScreenOpened);
        inbound::deliver(InboundEvent::LoginSuccess {
            user_id: "demo-user".to_string(),
            access_token: "demo-access-token-0123456789".to_string(),
            refresh_token: "demo-refresh-token".to_string(),
            login_type: 1,
            expiry: 0,
        });
    });
    if sdk_thread.join().is_err() {
        tracing::error!(target: "tech3c", "SDK simulation thread panicked");
    }
    schedule.run(&mut world);

    world.resource::<LoginScene>().on_logout_clicked();
    schedule.run(&mut world);

    gateway.cleanup();
    inbound::detach();
}
