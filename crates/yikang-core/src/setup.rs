// ── First-run database setup ──
//
// Seeds each table with starter rows so the public site has something
// to show. A missing table (42P01) is tolerated and the run moves on;
// any other failure stops the run. Every step appends a progress line.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{error, info};
use yikang_api::ServiceClient;

use crate::error::CoreError;
use crate::model::{Contact, DemoRequest, News, ProductCase, Record};

const RUNNING_MESSAGE: &str = "正在设置数据库...";
const SUCCESS_MESSAGE: &str = "数据库设置完成！网站现在已完全可用。";
const ERROR_MESSAGE: &str = "数据库设置失败，请检查错误信息。";
const FINISHED_LINE: &str = "🎉 数据库设置完成！所有表和数据都已成功创建。";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupStatus {
    #[default]
    Idle,
    Running,
    Success,
    Error,
}

struct SeedStep {
    table: &'static str,
    started: &'static str,
    finished: &'static str,
    failed: &'static str,
    rows: fn() -> Value,
}

const STEPS: [SeedStep; 4] = [
    SeedStep {
        table: Contact::TABLE,
        started: "创建联系人信息表...",
        finished: "✅ 联系人信息表创建成功",
        failed: "创建联系人表失败",
        rows: seed_contacts,
    },
    SeedStep {
        table: DemoRequest::TABLE,
        started: "创建演示预约表...",
        finished: "✅ 演示预约表创建成功",
        failed: "创建演示预约表失败",
        rows: seed_demo_requests,
    },
    SeedStep {
        table: News::TABLE,
        started: "创建新闻文章表...",
        finished: "✅ 新闻文章表创建成功",
        failed: "创建新闻表失败",
        rows: seed_news,
    },
    SeedStep {
        table: ProductCase::TABLE,
        started: "创建产品案例表...",
        finished: "✅ 产品案例表创建成功",
        failed: "创建产品案例表失败",
        rows: seed_cases,
    },
];

fn seed_contacts() -> Value {
    json!([{
        "name": "系统测试用户",
        "phone": "13800138000",
        "email": "system@test.com",
        "hospital_name": "系统测试医院",
        "position": "测试职位",
        "message": "这是系统自动创建的测试数据，用于初始化数据库表结构",
        "status": "new"
    }])
}

fn seed_demo_requests() -> Value {
    json!([{
        "contact_name": "系统测试联系人",
        "phone": "13800138000",
        "email": "system@test.com",
        "hospital_name": "系统测试医院",
        "preferred_product": "康复全程智能化管理系统",
        "preferred_time": "工作日上午",
        "message": "这是系统自动创建的测试数据",
        "status": "pending"
    }])
}

fn seed_news() -> Value {
    json!([
        {
            "title": "智缘益慷发布全新康复全程智能化管理系统",
            "content": "上海智缘益慷科技有限公司正式发布其旗舰产品——康复全程智能化管理系统。该系统基于AI大模型和数字孪生技术，为康复医院提供前所未有的管理效率和治疗效果。系统通过智能化的康复评估、个性化治疗方案制定以及实时效果监测，帮助医疗机构提升整体康复服务质量。",
            "summary": "智缘益慷正式发布康复全程智能化管理系统，基于AI大模型技术为医院提供智能化康复解决方案。",
            "published_at": "2025-07-25",
            "status": "published",
            "author": "智缘益慷科技团队"
        },
        {
            "title": "与知名三甲医院达成战略合作",
            "content": "智缘益慷与国内多家知名三甲医院签署战略合作协议，将在数字化康复、远程医疗等领域开展深度合作。此次合作标志着智缘益慷在医疗信息化领域的重要突破，为公司未来发展奠定了坚实基础。",
            "summary": "智缘益慷与多家三甲医院签署战略合作协议，共同推进数字化康复技术的应用。",
            "published_at": "2025-07-20",
            "status": "published",
            "author": "智缘益慷科技团队"
        },
        {
            "title": "荣获2025年度医疗科技创新奖",
            "content": "在近日举办的2025年度医疗科技创新大会上，智缘益慷凭借其在AI康复领域的突出贡献，荣获\"年度医疗科技创新奖\"。这一荣誉充分肯定了公司在推动医疗数字化转型方面的努力和成就。",
            "summary": "智缘益慷荣获2025年度医疗科技创新奖，在AI康复领域的贡献获得行业认可。",
            "published_at": "2025-07-15",
            "status": "published",
            "author": "智缘益慷科技团队"
        }
    ])
}

fn seed_cases() -> Value {
    json!([
        {
            "title": "某三甲医院康复科数字化转型项目",
            "hospital_name": "北京协和医院",
            "product_name": "康复全程智能化管理系统",
            "description": "通过部署智缘益慷的康复全程智能化管理系统，该医院康复科实现了从评估到治疗的全流程数字化管理，大幅提升了治疗效率和患者满意度。",
            "result_summary": "治疗师工作效率提升35%，患者康复效果评分提高40%，整体满意度达98%",
            "status": "active"
        },
        {
            "title": "社区康复中心远程康复服务试点",
            "hospital_name": "上海市第一人民医院",
            "product_name": "数字化远程康复系统",
            "description": "在社区康复中心部署远程康复系统，为居家康复患者提供专业指导和监督，有效解决了康复资源不足的问题。",
            "result_summary": "服务覆盖患者增加200%，居家康复依从性提高45%，医疗成本降低30%",
            "status": "active"
        },
        {
            "title": "区域医联体康复协同管理平台建设",
            "hospital_name": "浙江省人民医院",
            "product_name": "康复医联体共同管理平台",
            "description": "建设覆盖省内多家医院的康复协同管理平台，实现了患者转诊、资源调度和数据共享的一体化管理。",
            "result_summary": "转诊效率提升60%，资源利用率提高50%，患者满意度达96%",
            "status": "active"
        }
    ])
}

/// One setup run: status, headline message, and progress log.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DatabaseSetup {
    status: SetupStatus,
    message: String,
    progress: Vec<String>,
}

impl DatabaseSetup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SetupStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn progress(&self) -> &[String] {
        &self.progress
    }

    fn log(&mut self, line: String, on_progress: &mut impl FnMut(&str)) {
        on_progress(&line);
        self.progress.push(line);
    }

    /// Seed every table in order, reporting each progress line as it happens.
    pub async fn run_with(
        &mut self,
        client: &ServiceClient,
        mut on_progress: impl FnMut(&str),
    ) -> SetupStatus {
        self.status = SetupStatus::Running;
        self.progress.clear();
        self.message = RUNNING_MESSAGE.into();

        match self.seed(client, &mut on_progress).await {
            Ok(()) => {
                self.log(FINISHED_LINE.into(), &mut on_progress);
                self.status = SetupStatus::Success;
                self.message = SUCCESS_MESSAGE.into();
                info!("database setup finished");
            }
            Err(message) => {
                error!(%message, "database setup failed");
                self.log(format!("❌ 错误: {message}"), &mut on_progress);
                self.status = SetupStatus::Error;
                self.message = ERROR_MESSAGE.into();
            }
        }
        self.status
    }

    pub async fn run(&mut self, client: &ServiceClient) -> SetupStatus {
        self.run_with(client, |_| {}).await
    }

    async fn seed(
        &mut self,
        client: &ServiceClient,
        on_progress: &mut impl FnMut(&str),
    ) -> Result<(), String> {
        for step in &STEPS {
            self.log(step.started.into(), on_progress);
            let rows = (step.rows)();
            let result = client.insert::<Value, _>(step.table, &rows).await;
            match result.map_err(CoreError::from) {
                Ok(_) => {}
                Err(e) if e.is_table_missing() => {
                    info!(table = step.table, "table missing, skipping seed rows");
                }
                Err(e) => return Err(format!("{}: {e}", step.failed)),
            }
            self.log(step.finished.into(), on_progress);
        }
        Ok(())
    }
}
