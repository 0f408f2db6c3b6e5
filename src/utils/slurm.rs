//! # Slurm 脚本生成工具
//!
//! 将解析完成的 `JobDescriptor` 渲染为 `#SBATCH` 指令头，
//! 并拼接固定的 Q-Chem 作业脚本主体。
//!
//! ## 指令顺序
//! ```text
//! #!/bin/bash
//! #SBATCH --job-name=<name>
//! #SBATCH --nodes=1
//! #SBATCH --mem=<mem>              (已设置时)
//! #SBATCH -n <ncpus>               (已设置时)
//! #SBATCH --gres=scratch:<GB>      (已设置时)
//! #SBATCH --time=<DD-HH:MM:SS>     (已设置时)
//! #SBATCH --mail-user=<mail>       (配置了邮箱时)
//! #SBATCH --mail-type=<types>      (配置了邮箱且事件非空时)
//! #SBATCH --output="%x.o%j"
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs` 使用
//! - 使用 `models/job.rs`

use crate::error::ResolveWarning;
use crate::models::{JobDescriptor, ResourceKind};

/// 检查必需字段（walltime、内存、scratch），缺失时返回警告
pub fn check_required(job: &JobDescriptor) -> Vec<ResolveWarning> {
    let res = &job.resources;
    [
        (ResourceKind::WallTime, res.walltime.is_set()),
        (ResourceKind::Memory, res.memory.is_set()),
        (ResourceKind::Scratch, res.scratch.is_set()),
    ]
    .into_iter()
    .filter(|(_, set)| !set)
    .map(|(field, _)| ResolveWarning::MissingField { field })
    .collect()
}

/// 生成有序的 `#SBATCH` 指令行（不含 shebang）
pub fn render_directives(job: &JobDescriptor) -> Vec<String> {
    let res = &job.resources;
    let mut lines = vec![
        format!("#SBATCH --job-name={}", job.job_name),
        "#SBATCH --nodes=1".to_string(),
    ];

    if let Some(mem) = res.memory_directive() {
        lines.push(format!("#SBATCH --mem={}", mem));
    }
    if let Some(ncpus) = res.ncpus_directive() {
        lines.push(format!("#SBATCH -n {}", ncpus));
    }
    if let Some(scratch) = res.scratch_directive() {
        lines.push(format!("#SBATCH --gres=scratch:{}", scratch));
    }
    if let Some(time) = res.walltime_directive() {
        lines.push(format!("#SBATCH --time={}", time));
    }

    if let Some(ref mail) = job.mail {
        lines.push(format!("#SBATCH --mail-user={}", mail));

        let mail_type: String = job
            .mail_types
            .join(",")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if !mail_type.is_empty() {
            lines.push(format!("#SBATCH --mail-type={}", mail_type));
        }
    }

    lines.push("#SBATCH --output=\"%x.o%j\"".to_string());
    lines
}

/// 生成作业脚本头
pub fn create_header(job: &JobDescriptor) -> String {
    let mut header = String::from("#!/bin/bash\n");
    for line in render_directives(job) {
        header.push_str(&line);
        header.push('\n');
    }
    header
}

/// 生成完整的 sbatch 脚本内容
pub fn generate_jobscript(job: &JobDescriptor) -> String {
    let ncpus = job.resources.ncpus.effective().copied().unwrap_or(1);

    let mut script = create_header(job);
    script.push_str(JOBSCRIPT_FUNCTIONS);
    script.push_str(&payload_hooks(
        &job.infile,
        &job.launcher.display().to_string(),
        ncpus,
    ));
    script.push_str(JOBSCRIPT_FOOTER);
    script
}

/// 拷贝单个文件或目录的脚本片段
fn copy_back(from_dir: &str, to_dir: &str, name: &str) -> String {
    format!(
        r#"if [ -r "{from}/{name}" ]; then
    CPARGS="--dereference"
    [ -d "{from}/{name}" ] && CPARGS="--recursive"
    DIR=$(dirname "{name}")
    mkdir -p "{to}/$DIR"
    cp $CPARGS "{from}/{name}" "{to}/$DIR"
fi
"#,
        from = from_dir,
        to = to_dir,
        name = name,
    )
}

/// 作业主体与出错时的回拷
fn payload_hooks(infile: &str, launcher: &str, ncpus: u32) -> String {
    let input = format!("{}.in", infile);
    let output = format!("{}.out", infile);

    let mut hooks = String::from("\npayload_hooks() {\n:\n");
    hooks.push_str(&copy_back("$SLURM_SUBMIT_DIR", "$NODE_WORKDIR", &input));
    hooks.push_str(&format!(
        r#"
export QCSCRATCH="$NODE_SCRATCHDIR"
{launcher} -slurm -nt {ncpus} "{input}" "{output}"
RETURN_VALUE=$?

# check if job terminated successfully
if ! tail -n 30 "{output}" | grep -q "Thank you very much for using Q-Chem.  Have a nice day."; then
    RETURN_VALUE=1
fi

"#
    ));
    for name in [
        output.clone(),
        format!("{}.in.fchk", infile),
        "plots".to_string(),
        format!("{}.out.plots", infile),
    ] {
        hooks.push_str(&copy_back("$NODE_WORKDIR", "$SLURM_SUBMIT_DIR", &name));
    }
    hooks.push_str("}\n");

    hooks.push_str("\nerror_hooks() {\n:\n");
    hooks.push_str(&copy_back("$NODE_WORKDIR", "$SLURM_SUBMIT_DIR", &output));
    hooks.push_str("}\n");
    hooks
}

const JOBSCRIPT_FUNCTIONS: &str = r#"
SUBMIT_HOST=$SLURM_SUBMIT_HOST
SUBMIT_WORKDIR=$SLURM_SUBMIT_DIR
JOBID=$SLURM_JOB_ID
JOBNAME=$SLURM_JOB_NAME
QUEUE=$SLURM_JOB_PARTITION
NODES=$(scontrol show hostnames "$SLURM_JOB_NODELIST")
RETURN_VALUE=0
NODE_WORKDIR=$SCRATCH
NODE_SCRATCHDIR=$TMPDIR
#
###################################
#
print_info() {
    echo ------------------------------------------------------
    echo "Job is running on nodes"
    echo "$NODES" | sed 's/^/    /g'
    echo ------------------------------------------------------
    echo qsys: job was submitted from $SUBMIT_HOST
    echo qsys: executing queue is $QUEUE
    echo qsys: original working directory is $SUBMIT_WORKDIR
    echo qsys: job identifier is $JOBID
    echo qsys: job name is $JOBNAME
    echo ------------------------------------------------------
    echo
}

stage_in() {
    rm -f "$SUBMIT_WORKDIR/job_not_successful"

    echo "Calculation working directory: $NODE_WORKDIR"
    echo "            scratch directory: $NODE_SCRATCHDIR"

    cd $NODE_WORKDIR
    echo
}

stage_out() {
    if [ "$RETURN_VALUE" != "0" ]; then
        touch "$SUBMIT_WORKDIR/job_not_successful"
    fi

    echo
    echo "Final files in $SUBMIT_WORKDIR:"
    (
        cd $SUBMIT_WORKDIR
        ls -l | sed 's/^/    /g'
    )
    echo

    if [ -z "$(ls -A "$NODE_SCRATCHDIR" 2>/dev/null)" ]; then
        du -shc * | sed 's/^/    /g'
    else
        du -shc * "$NODE_SCRATCHDIR"/* | sed 's/^/    /g'
    fi
    echo
}

handle_error() {
    # only run once, not once per parallel process
    trap ':' 2 9 15

    echo
    echo '#######################################'
    echo '#-- Early termination signal caught --#'
    echo '#######################################'
    echo
    error_hooks
    stage_out
}
"#;

const JOBSCRIPT_FOOTER: &str = r#"
###################################
#
# Run the stuff:

print_info
stage_in

trap 'handle_error' 2 9 15

payload_hooks
stage_out
exit $RETURN_VALUE
"#;
