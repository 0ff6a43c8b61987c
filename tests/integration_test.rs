use bevy_ecs::prelude::*;
use std::sync::{Arc, Mutex};
use tech3c_bridge::config::{BridgeConfig, Language};
use tech3c_bridge::core::{
    process_main_thread_tasks_system, ImmediateExecutor, MainThreadQueueResource,
};
use tech3c_bridge::domain::{ErrorEvent, LoginType};
use tech3c_bridge::gateway::SessionGateway;
use tech3c_bridge::platform::inbound::{self, InboundEvent};
use tech3c_bridge::platform::{HeadlessAdapter, Operation};
use tech3c_bridge::scene::{LoginScene, StatusColor};

const CONFIG: &str = r#"
[credentials]
client_id = "3cgame"
client_secret = "secret"

[auth]
language = "Chinese"
require_otp = true
"#;

#[test]
fn test_config_to_initialized_gateway() -> anyhow::Result<()> {
    let config = BridgeConfig::from_toml_str(CONFIG)?;
    config.validate()?;

    let adapter = Arc::new(HeadlessAdapter::new());
    let gateway = SessionGateway::new(adapter.clone(), Arc::new(ImmediateExecutor));

    // 初始化前的配置不会丢失
    gateway.apply_config(&config.auth);
    assert_eq!(adapter.call_count(), 0);
    assert_eq!(gateway.config().language, Language::Chinese);

    assert!(gateway.initialize(
        &config.credentials.client_id,
        &config.credentials.client_secret
    ));
    gateway.apply_config(&gateway.config());

    let language = adapter.calls_for(Operation::SetLanguage);
    assert_eq!(language.len(), 1);
    assert_eq!(language[0].int_arg(0), Some(2));
    Ok(())
}

/// 外部线程上报 -> 入站路由 -> 网关 -> 主线程队列 -> ECS 系统 -> 场景
#[test]
fn test_foreign_events_reach_scene_through_ecs() -> anyhow::Result<()> {
    let queue = MainThreadQueueResource::default();
    let gateway = SessionGateway::shared(Arc::new(HeadlessAdapter::new()), queue.queue.clone())?;

    let errors: Arc<Mutex<Vec<i32>>> = Arc::new(Mutex::new(Vec::new()));
    let scene = LoginScene::attach(gateway.clone());
    assert!(scene.initialize_sdk(
        &BridgeConfig::from_toml_str(CONFIG)?.credentials,
        &LoginScene::demo_config()
    ));

    let mut world = World::default();
    world.insert_resource(queue.clone());
    world.insert_resource(scene);
    let mut schedule = Schedule::default();
    schedule.add_systems(process_main_thread_tasks_system);

    world.resource::<LoginScene>().on_login_clicked();
    std::thread::spawn(|| {
        inbound::deliver(InboundEvent::AuthScreenOpened);
        inbound::deliver(InboundEvent::LoginSuccess {
            user_id: "player-1".into(),
            access_token: "token-1".into(),
            refresh_token: "refresh-1".into(),
            login_type: 2,
            expiry: 0,
        });
    })
    .join()
    .map_err(|_| anyhow::anyhow!("sdk thread panicked"))?;

    // 状态已更新，但场景要等队列排空
    assert!(gateway.is_logged_in());
    assert_eq!(gateway.current_user().login_type, LoginType::Social);
    assert_eq!(world.resource::<LoginScene>().view().status, "Showing login screen...");

    schedule.run(&mut world);
    let view = world.resource::<LoginScene>().view();
    assert_eq!(view.status, "Login successful!");
    assert_eq!(view.status_color, StatusColor::Green);
    assert!(view.logout_button_visible);

    // 错误回调被场景占用，这里另设一个以验证 2000
    let sink = errors.clone();
    gateway.set_error_callback(move |event: &ErrorEvent| {
        sink.lock().unwrap().push(event.legacy_code())
    });
    inbound::deliver(InboundEvent::Error {
        message: "Session expired".into(),
    });
    schedule.run(&mut world);
    assert_eq!(*errors.lock().unwrap(), vec![2000]);

    world.resource::<LoginScene>().on_logout_clicked();
    schedule.run(&mut world);
    assert!(!gateway.is_logged_in());
    assert!(world.resource::<LoginScene>().view().login_button_visible);

    // 清理后排队中的事件不会触达旧订阅者
    inbound::deliver(InboundEvent::AuthCancelled);
    gateway.cleanup();
    schedule.run(&mut world);
    assert_eq!(
        world.resource::<LoginScene>().view().status,
        "Logged out successfully"
    );

    drop(world);
    drop(gateway);
    assert!(!inbound::is_attached());
    Ok(())
}

#[test]
fn test_not_initialized_errors_are_queued_in_order() {
    let queue = MainThreadQueueResource::default();
    let gateway = SessionGateway::new(Arc::new(HeadlessAdapter::new()), queue.queue.clone());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    gateway.set_error_callback(move |event: &ErrorEvent| {
        sink.lock().unwrap().push(event.legacy_code())
    });

    gateway.show_auth();
    gateway.set_require_otp(true);
    gateway.on_error("late failure");
    assert!(seen.lock().unwrap().is_empty());

    assert_eq!(queue.queue.process_pending(), 3);
    assert_eq!(*seen.lock().unwrap(), vec![1001, 1001, 2000]);
}
